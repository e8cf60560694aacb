//! Report command - render the price increase report.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use crate::report::{read_price_changes, PriceReport};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Price changes table to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report title
    #[arg(short, long)]
    title: Option<String>,
}

pub fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let input = args
        .input
        .unwrap_or_else(|| config.output.path(&config.output.price_changes_file));
    let output = args
        .output
        .unwrap_or_else(|| config.output.path(&config.report.file));
    let title = args.title.unwrap_or(config.report.title);

    if !input.exists() {
        warn!("Price changes table not found: {}", input.display());
        println!(
            "{} {} not found. Run 'pricetrack process' first.",
            style("✗").red(),
            input.display()
        );
        println!("No price increases found to report.");
        return Ok(());
    }

    let rows = read_price_changes(fs::File::open(&input)?)?;
    info!("Read {} price changes from {}", rows.len(), input.display());

    let Some(report) = PriceReport::from_rows(rows) else {
        println!("No price increases found to report.");
        return Ok(());
    };

    let generated = chrono::Local::now().date_naive();
    let mut document = report.render(&title, generated, config.report.highlight_threshold)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    document.save(&output)?;

    let largest = report.largest();
    println!(
        "{} Report written to {}",
        style("✓").green(),
        output.display()
    );
    println!("  Items with increases: {}", report.count());
    println!("  Average increase:     {:.2}%", report.average_increase());
    println!(
        "  Largest increase:     {:.2}% ({})",
        largest.percentage_change, largest.item_name
    );

    Ok(())
}
