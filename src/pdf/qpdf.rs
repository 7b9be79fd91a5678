//! qpdf FFI wrapper for page extraction
//!
//! Builds new PDFs from an ordered subset of a source document's pages using
//! the qpdf crate (vendored FFI).

use crate::error::{Error, Result};
use qpdf::QPdf;

/// Wrapper for qpdf operations via FFI
pub struct QpdfWrapper;

/// Check the `%PDF` magic before handing bytes to qpdf
pub(crate) fn ensure_pdf_magic(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}

/// Map qpdf crate errors to our error types
fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::QpdfError {
        reason: e.to_string(),
    }
}

fn open_qpdf(data: &[u8]) -> Result<QPdf> {
    ensure_pdf_magic(data)?;
    QPdf::read_from_memory(data).map_err(map_qpdf_error)
}

impl QpdfWrapper {
    /// Copy the given pages, in the given order, into a new PDF
    ///
    /// # Arguments
    /// * `input_data` - Raw PDF bytes
    /// * `pages` - 0-indexed page indices
    ///
    /// # Returns
    /// The new PDF as bytes
    pub fn extract_pages(input_data: &[u8], pages: &[usize]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(Error::QpdfError {
                reason: "No pages selected".to_string(),
            });
        }

        let source = open_qpdf(input_data)?;
        let num_pages = source.get_num_pages().map_err(map_qpdf_error)?;

        let dest = QPdf::empty();

        for &idx in pages {
            let out_of_bounds = || Error::PageOutOfBounds {
                page: (idx as u32).saturating_add(1),
                total: num_pages,
            };
            let idx = u32::try_from(idx).map_err(|_| out_of_bounds())?;
            let page = source.get_page(idx).ok_or_else(out_of_bounds)?;
            let copied = dest.copy_from_foreign(&page);
            dest.add_page(&copied, false).map_err(map_qpdf_error)?;
        }

        let mut writer = dest.writer();
        writer.preserve_encryption(false);
        writer.write_to_memory().map_err(map_qpdf_error)
    }

    /// Get the page count of a PDF
    pub fn get_page_count(input_data: &[u8]) -> Result<u32> {
        let qpdf = open_qpdf(input_data)?;
        qpdf.get_num_pages().map_err(map_qpdf_error)
    }
}
