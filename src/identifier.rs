//! Quotation number and version extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static QUOTATION_NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Quotation No\.\s*:\s*(\w+)").expect("valid quotation regex"));

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Version\s*:\s*(\S+)").expect("valid version regex"));

/// Version assumed when a page carries a quotation number but no version
pub const DEFAULT_VERSION: &str = "1";

/// Extract the token following `Quotation No.:`
pub fn extract_number(text: &str) -> Option<String> {
    QUOTATION_NO_RE
        .captures(text.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the token following `Version:`
pub fn extract_version(text: &str) -> Option<String> {
    VERSION_RE
        .captures(text.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Identifier pulled from a single page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub quotation_number: String,
    pub version: String,
}

impl Identifier {
    /// `None` when no quotation number is present. A missing version falls
    /// back to [`DEFAULT_VERSION`].
    pub fn from_text(text: &str) -> Option<Self> {
        let quotation_number = extract_number(text)?;
        let version = extract_version(text).unwrap_or_else(|| DEFAULT_VERSION.to_string());
        Some(Self {
            quotation_number,
            version,
        })
    }
}

/// How pages are bucketed for identifier-keyed grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKeying {
    /// `(quotation number, version)` pairs
    #[default]
    NumberAndVersion,
    /// Quotation number alone
    NumberOnly,
}

/// Composite grouping key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierKey {
    pub quotation_number: String,
    /// Absent under [`IdentifierKeying::NumberOnly`]
    pub version: Option<String>,
}

impl IdentifierKeying {
    pub fn key_for(&self, id: &Identifier) -> IdentifierKey {
        IdentifierKey {
            quotation_number: id.quotation_number.clone(),
            version: match self {
                IdentifierKeying::NumberAndVersion => Some(id.version.clone()),
                IdentifierKeying::NumberOnly => None,
            },
        }
    }
}
