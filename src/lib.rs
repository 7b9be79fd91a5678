//! Scan Splitter Library
//!
//! Splits scanned PDFs into per-document files using OCR:
//! - `classify`: tag pages as CoA, Pilot or Unknown by phrase matching
//! - `identifier`: pull quotation numbers and versions from page text
//! - `grouping`: header-delimited and identifier-keyed page groups
//! - `pipeline`: OCR, group and write one PDF
//! - `batch`: process a directory of PDFs on a bounded worker pool

pub mod batch;
pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod grouping;
pub mod identifier;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod writer;

pub use batch::{discover_pdfs, run_batch, run_source_dir, FileOutcome};
pub use classify::{classify, PageType, Vocabulary};
pub use config::{SplitterConfig, ToolConfig};
pub use document::{Document, Page};
pub use error::{Error, Result};
pub use grouping::{group_by_header, group_by_identifier, HeaderGroup, IdentifierGroup};
pub use identifier::{extract_number, extract_version, Identifier, IdentifierKey, IdentifierKeying};
pub use ocr::{OcrTextExtractor, TextExtractor};
pub use pipeline::{plan_outputs, FileReport, SplitPipeline, SplitPlan};
pub use writer::{PageWriter, QpdfPageWriter};
