//! Text extraction for scanned PDFs
//!
//! Pages are rasterized with PDFium into a temporary directory and each image
//! is passed through tesseract. The pipeline only sees the [`TextExtractor`]
//! trait.

mod tesseract;

pub use tesseract::TesseractOcr;

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use crate::pdf::PdfiumRasterizer;

/// Converts a PDF into one text string per page, in page order
pub trait TextExtractor: Send + Sync {
    fn extract_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>>;

    /// Name of this extraction backend (for diagnostics)
    fn backend_name(&self) -> &str;
}

/// PDFium rendering followed by tesseract OCR
#[derive(Debug, Clone)]
pub struct OcrTextExtractor {
    rasterizer: PdfiumRasterizer,
    ocr: TesseractOcr,
}

impl OcrTextExtractor {
    pub fn new(rasterizer: PdfiumRasterizer, ocr: TesseractOcr) -> Self {
        Self { rasterizer, ocr }
    }

    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(
            PdfiumRasterizer::new(&tools.pdfium_dir, tools.dpi),
            TesseractOcr::new(&tools.tesseract, &tools.tesseract_lang),
        )
    }

    /// Check the OCR binary up front instead of once per file
    pub fn check_tools(&self) -> Result<()> {
        self.ocr.ensure_available()
    }
}

impl TextExtractor for OcrTextExtractor {
    fn extract_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>> {
        let scratch = tempfile::tempdir().map_err(Error::Io)?;
        let images = self.rasterizer.render_all(pdf_bytes, scratch.path())?;

        let mut texts = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let page = i as u32 + 1;
            let text = self.ocr.recognize(image, page)?;
            tracing::debug!(page, chars = text.len(), "ocr page complete");
            texts.push(text);
        }

        Ok(texts)
    }

    fn backend_name(&self) -> &str {
        "pdfium+tesseract"
    }
}
