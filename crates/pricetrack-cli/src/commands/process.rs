//! Process command - extract line items and detect price changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use pricetrack_core::processor::{BatchResult, ProcessorConfig};
use pricetrack_core::{
    analyze_price_changes, build_price_history, Document, DocumentProcessor, DocumentType,
    PriceAnalysis, PriceChangeSummary, TrackerConfig,
};

use crate::tables::{self, ItemsLayout};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Directory of invoice PDFs
    #[arg(long)]
    invoices: Option<PathBuf>,

    /// Directory of receipt PDFs
    #[arg(long)]
    receipts: Option<PathBuf>,

    /// Directory the tables are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write one table per document
    #[arg(long)]
    per_document: bool,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config_path)?;

    if let Some(dir) = args.invoices {
        config.input.invoice_dir = dir;
    }
    if let Some(dir) = args.receipts {
        config.input.receipt_dir = Some(dir);
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if args.per_document {
        config.output.per_document_csv = true;
    }

    let invoice_processor = processor(&config, DocumentType::Invoice);
    let receipt_processor = processor(&config, DocumentType::Receipt);

    let invoice_files = invoice_processor.list_documents(&config.input.invoice_dir)?.len();
    let receipt_files = match &config.input.receipt_dir {
        Some(dir) => receipt_processor.list_documents(dir)?.len(),
        None => 0,
    };

    let total = invoice_files + receipt_files;
    if total == 0 {
        println!(
            "{} No documents found in {}, nothing to do.",
            style("ℹ").blue(),
            config.input.invoice_dir.display()
        );
        return Ok(());
    }

    println!("{} Found {} documents to process", style("ℹ").blue(), total);

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents",
            )?
            .progress_chars("=>-"),
    );

    let invoices = invoice_processor
        .process_directory_with(&config.input.invoice_dir, |_| progress.inc(1))?;
    let receipts = match &config.input.receipt_dir {
        Some(dir) => receipt_processor.process_directory_with(dir, |_| progress.inc(1))?,
        None => BatchResult::default(),
    };

    progress.finish_and_clear();

    print_failures(&invoices, &receipts);

    if invoices.documents.is_empty() && receipts.documents.is_empty() {
        println!(
            "{} No documents could be processed, nothing to do.",
            style("ℹ").blue()
        );
        return Ok(());
    }

    write_item_tables(&config, &invoices.documents, &receipts.documents)?;

    let history = if config.analysis.include_receipts {
        build_price_history(invoices.documents.iter().chain(&receipts.documents))
    } else {
        build_price_history(&invoices.documents)
    };

    let tracking_path = config.output.path(&config.output.price_tracking_file);
    tables::write_file(&tracking_path, |f| tables::write_price_tracking(f, &history))?;
    info!("Wrote {} price records to {}", history.len(), tracking_path.display());

    let analysis = analyze_price_changes(&history);
    let changes_path = config.output.path(&config.output.price_changes_file);
    if analysis.events.is_empty() {
        // A table left by an earlier run would describe other input
        if changes_path.exists() {
            fs::remove_file(&changes_path)?;
            info!("Removed stale {}", changes_path.display());
        }
    } else {
        tables::write_file(&changes_path, |f| tables::write_price_changes(f, &analysis.events))?;
        info!("Wrote {} price changes to {}", analysis.events.len(), changes_path.display());
    }

    println!();
    println!(
        "{} Processed {} invoices and {} receipts ({} items) in {:.2?}",
        style("✓").green(),
        invoices.documents.len(),
        receipts.documents.len(),
        invoices.item_count() + receipts.item_count(),
        start.elapsed()
    );
    print_analysis(&analysis);

    Ok(())
}

fn processor(config: &TrackerConfig, document_type: DocumentType) -> DocumentProcessor {
    DocumentProcessor::new(
        ProcessorConfig::new(document_type).with_extension(config.input.extension.clone()),
    )
}

fn write_item_tables(
    config: &TrackerConfig,
    invoices: &[Document],
    receipts: &[Document],
) -> anyhow::Result<()> {
    let output = &config.output;

    let items_path = output.path(&output.items_file);
    let rows = tables::write_file(&items_path, |f| {
        tables::write_items(f, invoices, ItemsLayout::Invoice)
    })?;
    info!("Wrote {} invoice items to {}", rows, items_path.display());

    if config.input.receipt_dir.is_some() {
        let receipts_path = output.path(&output.receipt_items_file);
        let rows = tables::write_file(&receipts_path, |f| {
            tables::write_items(f, receipts, ItemsLayout::Receipt)
        })?;
        info!("Wrote {} receipt items to {}", rows, receipts_path.display());

        let combined_path = output.path(&output.combined_file);
        let rows = tables::write_file(&combined_path, |f| {
            tables::write_items(f, invoices.iter().chain(receipts), ItemsLayout::Combined)
        })?;
        info!("Wrote {} combined items to {}", rows, combined_path.display());
    }

    if output.per_document_csv {
        let dir = output.dir.join(&output.per_document_dir);
        for document in invoices.iter().chain(receipts) {
            if document.items.is_empty() {
                continue;
            }
            let path = per_document_path(&dir, document);
            tables::write_file(&path, |f| tables::write_document(f, document))?;
            debug!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// `<dir>/<type>/<stem>.csv`, so an invoice and a receipt sharing a stem do not collide.
fn per_document_path(dir: &Path, document: &Document) -> PathBuf {
    dir.join(document.document_type.as_str())
        .join(format!("{}.csv", document.file_stem()))
}

fn print_failures(invoices: &BatchResult, receipts: &BatchResult) {
    for failure in invoices.failures.iter().chain(&receipts.failures) {
        println!(
            "{} Skipped {}: {}",
            style("✗").red(),
            failure.path.display(),
            failure.error
        );
    }
}

fn print_analysis(analysis: &PriceAnalysis) {
    for skipped in &analysis.skipped {
        println!(
            "{} {} went from {} to {} on {}: {}; no percentage recorded",
            style("⚠").yellow(),
            skipped.item_name,
            skipped.previous_price,
            skipped.current_price,
            skipped.current_date.format("%m/%d/%Y"),
            skipped.reason
        );
    }

    let Some(summary) = PriceChangeSummary::from_events(&analysis.events) else {
        println!("{} No price changes detected", style("ℹ").blue());
        return;
    };

    println!();
    println!("{}", style("Price changes").bold());
    println!("  Total:            {}", summary.total);
    println!("  Increases:        {}", style(summary.increases).red());
    println!("  Decreases:        {}", style(summary.decreases).green());
    println!("  Average change:   {:.2}%", summary.average_change);
    println!("  Largest increase: {:.2}%", summary.largest_increase);
    println!("  Largest decrease: {:.2}%", summary.largest_decrease);
}
