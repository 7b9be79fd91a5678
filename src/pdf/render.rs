//! Page rasterization with PDFium

use crate::error::{Error, Result};
use crate::pdf::qpdf::ensure_pdf_magic;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Bind PDFium, preferring the configured library directory.
///
/// A new instance is created per call; instances are not shared across
/// workers.
fn create_pdfium(library_dir: &Path) -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
        library_dir,
    ))
    .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")))
    .or_else(|_| Pdfium::bind_to_system_library())
    .map_err(|e| Error::Pdfium {
        reason: format!("Failed to initialize PDFium: {}", e),
    })?;

    Ok(Pdfium::new(bindings))
}

fn map_pdfium_error(err: PdfiumError) -> Error {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Error::InvalidPdf {
                reason: "PDF is password protected".to_string(),
            }
        }
        _ => Error::Pdfium {
            reason: format!("{}", err),
        },
    }
}

/// Renders every page of a PDF to PNG files
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    library_dir: PathBuf,
    dpi: u32,
}

impl PdfiumRasterizer {
    pub fn new(library_dir: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            library_dir: library_dir.into(),
            dpi,
        }
    }

    /// PDF user space is 72 points per inch
    fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }

    /// Render all pages into `out_dir` as `page_0001.png`, ... in page order.
    pub fn render_all(&self, data: &[u8], out_dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_pdf_magic(data)?;

        let pdfium = create_pdfium(&self.library_dir)?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(map_pdfium_error)?;

        let config = PdfRenderConfig::new()
            .scale_page_by_factor(self.scale())
            .render_form_data(true)
            .render_annotations(true);

        let mut images = Vec::new();

        for (index, page) in document.pages().iter().enumerate() {
            let page_num = index + 1;
            let bitmap = page.render_with_config(&config).map_err(|e| Error::Pdfium {
                reason: format!("Failed to render page {}: {}", page_num, e),
            })?;

            let image_path = out_dir.join(format!("page_{:04}.png", page_num));
            bitmap
                .as_image()
                .save_with_format(&image_path, image::ImageFormat::Png)
                .map_err(|e| Error::Pdfium {
                    reason: format!("Failed to encode page {} as PNG: {}", page_num, e),
                })?;

            tracing::debug!(page = page_num, path = %image_path.display(), "rendered page");
            images.push(image_path);
        }

        Ok(images)
    }
}
