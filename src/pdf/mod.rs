//! PDF processing layer
//!
//! Rendering goes through PDFium, page extraction through qpdf.

mod qpdf;
mod render;

pub use qpdf::QpdfWrapper;
pub use render::PdfiumRasterizer;
