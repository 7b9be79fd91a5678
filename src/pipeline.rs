//! Per-file split pipeline
//!
//! OCR, classification, grouping and writing run strictly in that order for
//! one input file. Nothing is shared between pipelines except the immutable
//! configuration and the stateless extractor/writer backends.

use crate::classify::PageType;
use crate::config::SplitterConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::grouping::{group_by_header, group_by_identifier};
use crate::identifier::IdentifierKey;
use crate::ocr::{OcrTextExtractor, TextExtractor};
use crate::writer::{PageWriter, QpdfPageWriter};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::Arc;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

/// Which grouping produced an output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputKind {
    Header { sequence: usize },
    Identifier { key: IdentifierKey },
}

/// One file to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub kind: OutputKind,
    pub destination: PathBuf,
    /// 0-indexed pages of the source, in output order
    pub pages: Vec<usize>,
}

/// Everything a source document will be split into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitPlan {
    pub outputs: Vec<PlannedOutput>,
    /// Header groups that matched no member pages
    pub skipped_headers: Vec<usize>,
}

/// Result of splitting one source file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    pub page_count: usize,
    pub written: Vec<PathBuf>,
}

/// Characters that cannot appear inside a single path component
fn is_hostile(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

/// Make an extracted token safe to embed in a file or directory name.
pub fn sanitize_component(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| if is_hostile(c) { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Substitute `{name}` placeholders in one pass; values are sanitized first.
///
/// Substituted text is never rescanned, so a value that itself looks like a
/// placeholder is kept literally. Unknown placeholders are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            match values.iter().find(|(name, _)| *name == &caps[1]) {
                Some((_, value)) => sanitize_component(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Compute the outputs for a document without touching the filesystem.
pub fn plan_outputs(document: &Document, config: &SplitterConfig, stem: &str) -> SplitPlan {
    let mut plan = SplitPlan::default();

    for group in group_by_header(document, config.header_member_type) {
        if group.pages.is_empty() {
            plan.skipped_headers.push(group.sequence);
            continue;
        }
        let n = group.sequence.to_string();
        let name = fill_template(
            &config.coa_file_template,
            &[("n", n.as_str()), ("stem", stem)],
        );
        plan.outputs.push(PlannedOutput {
            kind: OutputKind::Header {
                sequence: group.sequence,
            },
            destination: config.coa_output_dir.join(name),
            pages: group.pages,
        });
    }

    for group in group_by_identifier(document, config.identifier_keying) {
        let version = group.key.version.as_deref().unwrap_or_default();
        let relative = fill_template(
            config.pilot_template(),
            &[
                ("number", group.key.quotation_number.as_str()),
                ("version", version),
                ("stem", stem),
            ],
        );
        plan.outputs.push(PlannedOutput {
            kind: OutputKind::Identifier { key: group.key },
            destination: config.pilot_output_dir.join(relative),
            pages: group.pages,
        });
    }

    plan
}

/// OCR -> classify -> group -> write for a single PDF
pub struct SplitPipeline {
    config: Arc<SplitterConfig>,
    extractor: Arc<dyn TextExtractor>,
    writer: Arc<dyn PageWriter>,
}

impl SplitPipeline {
    pub fn new(
        config: SplitterConfig,
        extractor: Arc<dyn TextExtractor>,
        writer: Arc<dyn PageWriter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            extractor,
            writer,
        }
    }

    /// Pipeline with the PDFium/tesseract extractor and the qpdf writer.
    /// `config` should already be resolved against the install directory.
    ///
    /// Fails with [`Error::ToolNotFound`] if tesseract cannot be started.
    pub fn from_config(config: SplitterConfig) -> Result<Self> {
        let extractor = OcrTextExtractor::from_config(&config.tools);
        extractor.check_tools()?;
        Ok(Self::new(config, Arc::new(extractor), Arc::new(QpdfPageWriter)))
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Read and OCR a PDF into a [`Document`]
    pub fn load_document(&self, data: &[u8]) -> Result<Document> {
        let page_count = self.writer.page_count(data)?;
        let texts = self.extractor.extract_texts(data)?;
        if texts.len() != page_count {
            return Err(Error::PageCountMismatch {
                expected: page_count,
                actual: texts.len(),
            });
        }
        Ok(Document::from_texts(texts, &self.config.vocabulary))
    }

    /// Split one file. Outputs written before a failure are left in place.
    pub fn process_file(&self, path: &Path) -> Result<FileReport> {
        if !path.is_file() {
            return Err(Error::PdfNotFound {
                path: path.display().to_string(),
            });
        }

        let data = std::fs::read(path)?;
        tracing::info!(
            file = %path.display(),
            backend = self.extractor.backend_name(),
            "processing"
        );

        let document = self.load_document(&data)?;
        let coa_pages = document
            .pages()
            .iter()
            .filter(|p| p.page_type == PageType::CoA)
            .count();
        tracing::info!(
            file = %path.display(),
            pages = document.page_count(),
            coa_pages,
            headers = document.header_indices().len(),
            "classified"
        );

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let plan = plan_outputs(&document, &self.config, &stem);

        for sequence in &plan.skipped_headers {
            tracing::warn!(
                file = %path.display(),
                sequence,
                "header group has no member pages, skipped"
            );
        }

        let mut written = Vec::with_capacity(plan.outputs.len());
        for output in &plan.outputs {
            tracing::debug!(
                destination = %output.destination.display(),
                pages = ?output.pages,
                "writing output"
            );
            self.writer
                .write_pages(&data, &output.pages, &output.destination)?;
            tracing::info!(destination = %output.destination.display(), "wrote split");
            written.push(output.destination.clone());
        }

        Ok(FileReport {
            source: path.to_path_buf(),
            page_count: document.page_count(),
            written,
        })
    }
}
