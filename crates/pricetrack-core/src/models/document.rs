//! Purchase document models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A processed purchase document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Source file name (without directory).
    pub file_name: String,

    /// Invoice or receipt number; empty when not found.
    pub document_number: String,

    /// Document date as `MM/DD/YYYY`; empty when not found.
    pub date: String,

    /// Format the document was parsed as.
    pub document_type: DocumentType,

    /// Line items in the order they appear in the document.
    pub items: Vec<LineItem>,
}

impl Document {
    /// File name with the extension removed.
    pub fn file_stem(&self) -> &str {
        std::path::Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Kind of purchase document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Supplier invoice with a DESCRIPTION / QTY / RATE item table.
    Invoice,
    /// Store receipt without a structured item table.
    Receipt,
}

impl DocumentType {
    /// Lowercase name used in output tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Receipt => "receipt",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single purchased line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text item description, used verbatim as the price tracking key.
    pub description: String,

    /// Purchased quantity.
    pub quantity: u32,

    /// Price per unit as captured (or derived from the amount when only a total is given).
    pub unit_rate: Decimal,

    /// Line total as captured.
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_rate: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_rate,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_display() {
        assert_eq!(DocumentType::Invoice.to_string(), "invoice");
        assert_eq!(DocumentType::Receipt.as_str(), "receipt");
    }

    #[test]
    fn test_file_stem() {
        let doc = Document {
            file_name: "INV-1042.pdf".to_string(),
            document_number: "1042".to_string(),
            date: "01/15/2024".to_string(),
            document_type: DocumentType::Invoice,
            items: Vec::new(),
        };
        assert_eq!(doc.file_stem(), "INV-1042");
    }

    #[test]
    fn test_document_type_serde() {
        let json = serde_json::to_string(&DocumentType::Receipt).unwrap();
        assert_eq!(json, "\"receipt\"");
    }
}
