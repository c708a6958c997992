//! Schema command - print the expected document input format

use clap::Args;
use ivacalc::Document;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Document);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
