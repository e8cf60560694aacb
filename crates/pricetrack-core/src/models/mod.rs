//! Data models for documents, price history, and configuration.

pub mod config;
pub mod document;
pub mod price;

pub use config::TrackerConfig;
pub use document::{Document, DocumentType, LineItem};
pub use price::{PriceChangeEvent, PriceRecord, DOCUMENT_DATE_FORMAT};
