//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, trace};

use super::{Result, TextExtractor};
use crate::error::ExtractionError;

/// Text-layer extractor backed by lopdf (loading, decryption) and pdf-extract (text).
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new PDF text extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract page text from an in-memory PDF.
    pub fn extract_text_from_mem(&self, data: &[u8]) -> Result<String> {
        let mut doc =
            Document::load_mem(data).map_err(|e| ExtractionError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let decrypted;
        let raw: &[u8] = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(ExtractionError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut buffer = Vec::new();
            doc.save_to(&mut buffer).map_err(|e| {
                ExtractionError::Parse(format!("failed to save decrypted PDF: {}", e))
            })?;
            decrypted = buffer;
            &decrypted
        } else {
            data
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(ExtractionError::NoPages);
        }

        // pdf-extract panics on some documents lopdf accepts (e.g. unresolved fonts)
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(raw)
        }))
        .map_err(|payload| ExtractionError::TextExtraction(panic_message(payload.as_ref())))?
        .map_err(|e| ExtractionError::TextExtraction(e.to_string()))?;

        debug!("Extracted text from {} of {} pages", pages.len(), page_count);
        Ok(join_pages(pages))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        trace!("Reading {}", path.display());
        let data = fs::read(path).map_err(|source| ExtractionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_text_from_mem(&data)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("text extractor panicked: {}", detail)
}

/// Concatenate page texts in order, terminating each page with a newline.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    text
}
