//! PDF processing module.

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::PdfTextExtractor;

use std::path::Path;

use crate::error::ExtractionError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for text-layer extraction implementations.
///
/// The document processor only needs the page text of a file; keeping the
/// reader behind a trait lets other backends (or test fixtures) stand in.
pub trait TextExtractor {
    /// Extract the text of every page, in page order, each page followed by a newline.
    fn extract_text(&self, path: &Path) -> Result<String>;
}
