//! Field extraction from document text.
//!
//! Invoices and receipts share one capability set ([`DocumentFieldParser`]);
//! [`FieldParser`] selects the implementation from the [`DocumentType`].

mod invoice;
mod receipt;
pub mod patterns;

pub use invoice::InvoiceFieldParser;
pub use receipt::ReceiptFieldParser;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::document::{DocumentType, LineItem};

/// Trait for format-specific field extraction.
///
/// Missing fields are reported as empty strings and unmatched lines are
/// skipped; extraction itself never fails.
pub trait DocumentFieldParser {
    /// Document date as `MM/DD/YYYY`, or empty.
    fn extract_date(&self, text: &str) -> String;

    /// Document number, or empty.
    fn extract_document_number(&self, text: &str) -> String;

    /// Line items in text order.
    fn extract_items(&self, text: &str) -> Vec<LineItem>;
}

/// Field parser selected by document type.
#[derive(Debug, Clone, Copy)]
pub enum FieldParser {
    Invoice(InvoiceFieldParser),
    Receipt(ReceiptFieldParser),
}

impl FieldParser {
    pub fn for_type(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Invoice => FieldParser::Invoice(InvoiceFieldParser::new()),
            DocumentType::Receipt => FieldParser::Receipt(ReceiptFieldParser::new()),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            FieldParser::Invoice(_) => DocumentType::Invoice,
            FieldParser::Receipt(_) => DocumentType::Receipt,
        }
    }
}

impl DocumentFieldParser for FieldParser {
    fn extract_date(&self, text: &str) -> String {
        match self {
            FieldParser::Invoice(p) => p.extract_date(text),
            FieldParser::Receipt(p) => p.extract_date(text),
        }
    }

    fn extract_document_number(&self, text: &str) -> String {
        match self {
            FieldParser::Invoice(p) => p.extract_document_number(text),
            FieldParser::Receipt(p) => p.extract_document_number(text),
        }
    }

    fn extract_items(&self, text: &str) -> Vec<LineItem> {
        match self {
            FieldParser::Invoice(p) => p.extract_items(text),
            FieldParser::Receipt(p) => p.extract_items(text),
        }
    }
}

/// Parse a captured `[\d.]+` token; tokens such as `1.2.3` are rejected.
fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).ok()
}
