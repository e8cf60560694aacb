//! Config command - inspect and create the pricetrack configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use pricetrack_core::TrackerConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the configuration in effect and the files it resolves to
    Show,

    /// Write a configuration file with default settings
    Init(InitArgs),

    /// Show which configuration file is used
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the file (defaults to the file in effect)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, config_path),
        ConfigCommand::Path => show_path(config_path),
    }
}

/// `<user config dir>/pricetrack/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pricetrack")
        .join("config.json")
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = super::config_file(config_path);
    let config = super::load_config(config_path)?;

    if path.exists() {
        println!("{} Using {}", style("ℹ").blue(), path.display());
    } else {
        println!("{} No config file found, showing defaults.", style("ℹ").blue());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);

    println!();
    println!("{}", style("Inputs").bold());
    println!("  Invoices: {}", config.input.invoice_dir.display());
    match &config.input.receipt_dir {
        Some(dir) => println!("  Receipts: {}", dir.display()),
        None => println!("  Receipts: {}", style("not configured").dim()),
    }

    let output = &config.output;
    println!("{}", style("Tables").bold());
    for file in [
        &output.items_file,
        &output.receipt_items_file,
        &output.combined_file,
        &output.price_tracking_file,
        &output.price_changes_file,
    ] {
        println!("  {}", output.path(file).display());
    }
    if output.per_document_csv {
        println!("  {}", output.dir.join(&output.per_document_dir).display());
    }
    println!("{}", style("Report").bold());
    println!("  {}", output.path(&config.report.file).display());

    Ok(())
}

fn init_config(args: InitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| super::config_file(config_path));

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    TrackerConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = super::config_file(config_path);
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'pricetrack config init' to create it.");
    }

    Ok(())
}
