//! Batch processing of a directory of documents.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{debug, error, info, warn};

use crate::error::{Result, TrackerError};
use crate::models::document::{Document, DocumentType};
use crate::parser::{DocumentFieldParser, FieldParser};
use crate::pdf::{PdfTextExtractor, TextExtractor};

/// Settings for one document processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Format every file in the directory is parsed as.
    pub document_type: DocumentType,

    /// File extension to pick up (matched case-insensitively).
    pub extension: String,
}

impl ProcessorConfig {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            extension: "pdf".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// A document that could not be processed.
#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of processing a directory.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Successfully processed documents, in file name order.
    pub documents: Vec<Document>,

    /// Documents that were skipped because of an error.
    pub failures: Vec<DocumentFailure>,
}

impl BatchResult {
    pub fn item_count(&self) -> usize {
        self.documents.iter().map(|d| d.items.len()).sum()
    }
}

/// Extracts and parses every matching document in a directory.
pub struct DocumentProcessor<E = PdfTextExtractor> {
    config: ProcessorConfig,
    parser: FieldParser,
    extractor: E,
}

impl DocumentProcessor<PdfTextExtractor> {
    /// Create a processor that reads PDFs.
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_extractor(config, PdfTextExtractor::new())
    }
}

impl<E: TextExtractor> DocumentProcessor<E> {
    /// Create a processor with a custom text extractor.
    pub fn with_extractor(config: ProcessorConfig, extractor: E) -> Self {
        let parser = FieldParser::for_type(config.document_type);
        Self {
            config,
            parser,
            extractor,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.config.document_type
    }

    /// List matching files in `dir`, sorted by file name.
    ///
    /// A missing directory yields an empty list.
    pub fn list_documents(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir_str = dir
            .to_str()
            .ok_or_else(|| TrackerError::Config(format!("non UTF-8 path: {}", dir.display())))?;
        let pattern = format!("{}/*", glob::Pattern::escape(dir_str));

        let mut files: Vec<PathBuf> = glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable entry {}: {}", e.path().display(), e.error());
                    None
                }
            })
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(&self.config.extension))
            })
            .collect();

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("Found {} {} files in {}", files.len(), self.config.extension, dir.display());
        Ok(files)
    }

    /// Extract and parse a single document.
    pub fn process_file(&self, path: &Path) -> Result<Document> {
        info!("Processing: {}", path.display());

        let text = self.extractor.extract_text(path)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let document = Document {
            file_name,
            document_number: self.parser.extract_document_number(&text),
            date: self.parser.extract_date(&text),
            document_type: self.config.document_type,
            items: self.parser.extract_items(&text),
        };

        debug!(
            "{} {}: {} items dated '{}'",
            document.document_type,
            document.document_number,
            document.items.len(),
            document.date
        );
        Ok(document)
    }

    /// Process every matching document in `dir`.
    pub fn process_directory(&self, dir: &Path) -> Result<BatchResult> {
        self.process_directory_with(dir, |_| {})
    }

    /// Process every matching document in `dir`, calling `on_file` after each one.
    ///
    /// A failing document is logged and recorded; it never aborts the batch.
    pub fn process_directory_with<F>(&self, dir: &Path, mut on_file: F) -> Result<BatchResult>
    where
        F: FnMut(&Path),
    {
        let mut result = BatchResult::default();

        for path in self.list_documents(dir)? {
            match self.process_file(&path) {
                Ok(document) => result.documents.push(document),
                Err(e) => {
                    error!("Error processing {}: {}", path.display(), e);
                    result.failures.push(DocumentFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
            on_file(&path);
        }

        info!(
            "Processed {} {} documents ({} failed)",
            result.documents.len(),
            self.config.document_type,
            result.failures.len()
        );
        Ok(result)
    }
}
