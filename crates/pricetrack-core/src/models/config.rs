//! Configuration structures for the price tracking pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the pricetrack pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Where documents are read from.
    pub input: InputConfig,

    /// Where tables are written to.
    pub output: OutputConfig,

    /// Price history options.
    pub analysis: AnalysisConfig,

    /// Price increase report options.
    pub report: ReportConfig,
}

/// Document input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory of invoice PDFs.
    pub invoice_dir: PathBuf,

    /// Optional directory of receipt PDFs.
    pub receipt_dir: Option<PathBuf>,

    /// File extension to pick up (matched case-insensitively).
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            invoice_dir: PathBuf::from("Invoices"),
            receipt_dir: None,
            extension: "pdf".to_string(),
        }
    }
}

/// Table output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory all tables are written into.
    pub dir: PathBuf,

    pub items_file: String,
    pub receipt_items_file: String,
    pub combined_file: String,
    pub price_tracking_file: String,
    pub price_changes_file: String,

    /// Also write one table per document.
    pub per_document_csv: bool,

    /// Subdirectory of `dir` for per-document tables.
    pub per_document_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            items_file: "invoice_items.csv".to_string(),
            receipt_items_file: "receipt_items.csv".to_string(),
            combined_file: "combined_items.csv".to_string(),
            price_tracking_file: "price_tracking.csv".to_string(),
            price_changes_file: "price_changes.csv".to_string(),
            per_document_csv: false,
            per_document_dir: "documents".to_string(),
        }
    }
}

impl OutputConfig {
    /// Full path of a table file.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

/// Price history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Whether receipt items join the price history alongside invoices.
    pub include_receipts: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { include_receipts: true }
    }
}

/// Price increase report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output PDF file name, relative to the output directory.
    pub file: String,

    /// Title printed at the top of the report.
    pub title: String,

    /// Increases above this percentage are highlighted.
    pub highlight_threshold: Decimal,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file: "price_increase_report.pdf".to_string(),
            title: "Price Increase Report".to_string(),
            highlight_threshold: Decimal::new(5, 0),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
