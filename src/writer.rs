//! Output writer
//!
//! Writes a subset of a source PDF's pages to a new file. Missing parent
//! directories are created; an existing destination is never overwritten.

use crate::error::{Error, Result};
use crate::pdf::QpdfWrapper;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Counts and extracts pages of a source PDF
pub trait PageWriter: Send + Sync {
    /// Number of pages in the source PDF
    fn page_count(&self, source: &[u8]) -> Result<usize>;

    /// `pages` are 0-indexed and written in the given order.
    fn write_pages(&self, source: &[u8], pages: &[usize], destination: &Path) -> Result<()>;
}

/// [`PageWriter`] backed by qpdf
#[derive(Debug, Clone, Copy, Default)]
pub struct QpdfPageWriter;

impl PageWriter for QpdfPageWriter {
    fn page_count(&self, source: &[u8]) -> Result<usize> {
        Ok(QpdfWrapper::get_page_count(source)? as usize)
    }

    fn write_pages(&self, source: &[u8], pages: &[usize], destination: &Path) -> Result<()> {
        if pages.is_empty() {
            return Err(Error::EmptyGroup {
                path: destination.to_path_buf(),
            });
        }
        if destination.exists() {
            return Err(Error::DestinationExists {
                path: destination.to_path_buf(),
            });
        }

        let data = QpdfWrapper::extract_pages(source, pages)?;
        write_new_file(destination, &data)
    }
}

/// Create parent directories and write `data`, failing if the file exists.
pub fn write_new_file(destination: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // create_new closes the gap between the exists() check and the write
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                Error::DestinationExists {
                    path: destination.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;
    file.write_all(data)?;
    Ok(())
}
