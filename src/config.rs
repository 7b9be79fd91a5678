//! Splitter configuration
//!
//! Paths may be relative; [`SplitterConfig::resolve`] anchors them to the
//! program's install directory once, before the pipeline is built.

use crate::classify::{PageType, Vocabulary};
use crate::error::{Error, Result};
use crate::identifier::IdentifierKeying;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_COA_TEMPLATE: &str = "CoA_{n}.pdf";
pub const DEFAULT_PILOT_TEMPLATE: &str = "QB-{number}/PilotReport_V{version}.pdf";
pub const NUMBER_ONLY_PILOT_TEMPLATE: &str = "PilotReport_{number}.pdf";

/// External tool locations and OCR settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Tesseract binary; a bare name is looked up on `PATH`
    pub tesseract: PathBuf,
    /// Tesseract language code
    pub tesseract_lang: String,
    /// Directory holding the PDFium shared library
    pub pdfium_dir: PathBuf,
    /// Rendering resolution for OCR
    pub dpi: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tesseract: PathBuf::from("tesseract"),
            tesseract_lang: "eng".to_string(),
            pdfium_dir: PathBuf::from("pdfium"),
            dpi: 300,
        }
    }
}

/// Configuration for a splitting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Directory scanned for input PDFs
    pub source_dir: PathBuf,
    /// Optional glob on the file name (e.g. `"scan_*.pdf"`)
    pub source_pattern: Option<String>,
    /// Directory for header-delimited outputs
    pub coa_output_dir: PathBuf,
    /// File name template; `{n}` and `{stem}` are substituted
    pub coa_file_template: String,
    /// Root for identifier-keyed outputs
    pub pilot_output_dir: PathBuf,
    /// Relative path template; `{number}`, `{version}` and `{stem}` are
    /// substituted. Defaults depend on `identifier_keying` when unset.
    pub pilot_path_template: Option<String>,
    pub identifier_keying: IdentifierKeying,
    pub vocabulary: Vocabulary,
    /// Page type kept inside header-delimited spans
    pub header_member_type: PageType,
    pub tools: ToolConfig,
    /// Number of files processed concurrently
    pub max_workers: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("scans"),
            source_pattern: None,
            coa_output_dir: PathBuf::from("splits"),
            coa_file_template: DEFAULT_COA_TEMPLATE.to_string(),
            pilot_output_dir: PathBuf::from("splits"),
            pilot_path_template: None,
            identifier_keying: IdentifierKeying::default(),
            vocabulary: Vocabulary::default(),
            header_member_type: PageType::CoA,
            tools: ToolConfig::default(),
            max_workers: 4,
        }
    }
}

impl SplitterConfig {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.coa_file_template.contains("{n}") {
            return Err(Error::Config {
                reason: format!(
                    "coa_file_template must contain {{n}}: {}",
                    self.coa_file_template
                ),
            });
        }
        if self.tools.dpi == 0 {
            return Err(Error::Config {
                reason: "tools.dpi must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Effective template for identifier-keyed outputs
    pub fn pilot_template(&self) -> &str {
        match (&self.pilot_path_template, self.identifier_keying) {
            (Some(t), _) => t,
            (None, IdentifierKeying::NumberAndVersion) => DEFAULT_PILOT_TEMPLATE,
            (None, IdentifierKeying::NumberOnly) => NUMBER_ONLY_PILOT_TEMPLATE,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.max_workers.max(1)
    }

    /// True when concurrent files would all write `CoA_{n}` names into one
    /// directory, so only the first file to reach a name can succeed.
    pub fn coa_names_may_collide(&self) -> bool {
        self.worker_count() > 1 && !self.coa_file_template.contains("{stem}")
    }

    /// Anchor relative directories and tool paths to `install_dir`.
    pub fn resolve(&self, install_dir: &Path) -> Self {
        let anchor = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                install_dir.join(p)
            }
        };

        let mut resolved = self.clone();
        resolved.source_dir = anchor(&self.source_dir);
        resolved.coa_output_dir = anchor(&self.coa_output_dir);
        resolved.pilot_output_dir = anchor(&self.pilot_output_dir);
        resolved.tools.pdfium_dir = anchor(&self.tools.pdfium_dir);
        resolved.tools.tesseract = resolve_tool(install_dir, &self.tools.tesseract);
        resolved
    }
}

/// Prefer a tool bundled under `install_dir`, else leave the path for a
/// `PATH` lookup.
pub fn resolve_tool(install_dir: &Path, tool: &Path) -> PathBuf {
    if tool.is_absolute() {
        return tool.to_path_buf();
    }
    let bundled = install_dir.join(tool);
    if bundled.is_file() {
        bundled
    } else {
        tool.to_path_buf()
    }
}

/// Directory of the running executable
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| Error::Config {
        reason: format!("executable has no parent directory: {}", exe.display()),
    })
}
