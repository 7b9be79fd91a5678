use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// OCR backend that shells out to the tesseract binary
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    lang: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<PathBuf>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check if the configured binary can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Fail with [`Error::ToolNotFound`] if the binary cannot be started.
    pub fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::ToolNotFound {
                tool: "tesseract".to_string(),
                path: self.binary.clone(),
            })
        }
    }

    /// Recognize one page image. `page` is 1-indexed and only used for errors.
    pub fn recognize(&self, image_path: &Path, page: u32) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolNotFound {
                        tool: "tesseract".to_string(),
                        path: self.binary.clone(),
                    }
                } else {
                    Error::Ocr {
                        page,
                        reason: format!("failed to run tesseract: {}", e),
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr {
                page,
                reason: format!(
                    "tesseract exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
