//! Error types for the pricetrack-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the pricetrack library.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// PDF text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Invalid directory pattern while enumerating documents.
    #[error("invalid document pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while pulling the text layer out of a PDF.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file could not be opened or read.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid PDF.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The text layer could not be decoded.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Result type for the pricetrack library.
pub type Result<T> = std::result::Result<T, TrackerError>;
