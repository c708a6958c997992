//! Compute command - line-by-line liquidation view plus document totals

use crate::cmd::read_document;
use clap::Args;
use ivacalc::{DocumentTotals, LineItemResult};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// JSON file containing the document (or "-" for stdin)
    #[arg(short, long)]
    document: PathBuf,

    /// Output the full result as JSON
    #[arg(long)]
    json: bool,

    /// Output line results as CSV instead of a formatted table
    #[arg(long)]
    csv: bool,
}

/// Full result for JSON output
#[derive(Debug, Serialize)]
struct ComputeOutput<'a> {
    lines: &'a [LineItemResult],
    totals: &'a DocumentTotals,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let document = read_document(&self.document)?;
        let (lines, totals) = document.compute()?;

        if self.json {
            let output = ComputeOutput {
                lines: &lines,
                totals: &totals,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if self.csv {
            return write_csv(&lines);
        }

        print_table(&lines);
        print_totals(&totals);
        Ok(())
    }
}

fn write_csv(lines: &[LineItemResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for line in lines {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_table(lines: &[LineItemResult]) {
    if lines.is_empty() {
        println!("Document has no lines");
        return;
    }

    let rows: Vec<LineRow> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| LineRow::new(i + 1, line))
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn print_totals(totals: &DocumentTotals) {
    println!();
    println!("Exonerado:          {}", totals.exonerated_total);
    println!("Exento:             {}", totals.exempt_total);
    println!("Base gravada 5%:    {}", totals.taxable_base_5);
    println!("IVA 5%:             {}", totals.vat_5);
    println!("Base gravada 10%:   {}", totals.taxable_base_10);
    println!("IVA 10%:            {}", totals.vat_10);
    println!("No imputa IVA:      {}", totals.non_creditable_total);
    println!(
        "Total:              {} (MB {})",
        totals.grand_total, totals.grand_total_mb
    );
    for warning in &totals.warnings {
        println!("warning: {:?}", warning);
    }
}

/// Row for the line results table
#[derive(Debug, Clone, Tabled)]
struct LineRow {
    #[tabled(rename = "#")]
    order: String,

    #[tabled(rename = "Item")]
    item: String,

    #[tabled(rename = "Afectación")]
    affectation: String,

    #[tabled(rename = "Rate")]
    rate: String,

    #[tabled(rename = "Net")]
    net: String,

    #[tabled(rename = "Base")]
    taxable_base: String,

    #[tabled(rename = "IVA")]
    vat: String,

    #[tabled(rename = "Exenta")]
    exempt_base: String,

    #[tabled(rename = "Net MB")]
    net_mb: String,
}

impl LineRow {
    fn new(order: usize, line: &LineItemResult) -> Self {
        LineRow {
            order: order.to_string(),
            item: line.item_name.clone().unwrap_or_default(),
            affectation: line.affectation.to_string(),
            rate: line.tax_rate.to_string(),
            net: line.net.to_string(),
            taxable_base: line.taxable_base.to_string(),
            vat: line.vat.to_string(),
            exempt_base: line.exempt_base.to_string(),
            net_mb: line.net_mb.to_string(),
        }
    }
}
