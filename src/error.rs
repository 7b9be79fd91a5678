//! Error types for the scan splitter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the scan splitter
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the scan splitter
#[derive(Error, Debug)]
pub enum Error {
    /// Output file is already present; splits never overwrite
    #[error("File already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// qpdf error
    #[error("qpdf error: {reason}")]
    QpdfError { reason: String },

    /// Page out of bounds (1-indexed for display)
    #[error("Page {page} out of bounds (total: {total})")]
    PageOutOfBounds { page: u32, total: u32 },

    /// Attempted to write an output with no pages
    #[error("Refusing to write an empty PDF: {}", path.display())]
    EmptyGroup { path: PathBuf },

    /// External OCR/conversion binary could not be started
    #[error("{tool} not found at {}", path.display())]
    ToolNotFound { tool: String, path: PathBuf },

    /// OCR failed on a page (1-indexed)
    #[error("OCR failed on page {page}: {reason}")]
    Ocr { page: u32, reason: String },

    /// OCR produced a different number of texts than the PDF has pages
    #[error("OCR returned {actual} pages but the PDF has {expected}")]
    PageCountMismatch { expected: usize, actual: usize },

    /// Source directory could not be scanned
    #[error("Cannot read source directory {}: {reason}", path.display())]
    SourceDirectory { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Worker task failed to complete
    #[error("Task join error: {reason}")]
    TaskJoin { reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
