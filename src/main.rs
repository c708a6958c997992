use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(name = "ivacalc", version, about = "Compute Paraguayan IVA document totals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute line liquidations and document totals
    Compute(cmd::compute::ComputeCommand),
    /// Print the JSON Schema for the document input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Compute(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
