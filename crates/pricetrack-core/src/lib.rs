//! Core library for tracking unit prices across purchase documents.
//!
//! This crate provides:
//! - PDF text-layer extraction
//! - Line item extraction from invoices and receipts
//! - Batch processing of document directories with per-document failure isolation
//! - Chronological per-item price history and price change detection

pub mod analysis;
pub mod error;
pub mod history;
pub mod models;
pub mod parser;
pub mod pdf;
pub mod processor;

pub use analysis::{
    analyze_price_changes, mean, PriceAnalysis, PriceChangeSummary, SkipReason, SkippedChange,
};
pub use error::{ExtractionError, Result, TrackerError};
pub use history::build_price_history;
pub use models::config::TrackerConfig;
pub use models::document::{Document, DocumentType, LineItem};
pub use models::price::{PriceChangeEvent, PriceRecord};
pub use parser::{DocumentFieldParser, FieldParser, InvoiceFieldParser, ReceiptFieldParser};
pub use pdf::{PdfTextExtractor, TextExtractor};
pub use processor::DocumentProcessor;
