//! Page classification by phrase matching
//!
//! Every match is a case-sensitive substring test against the OCR text of a
//! single page. CoA phrases are checked before Pilot keywords.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag assigned to each page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageType {
    /// Certificate of Analysis / Specification Sheet page
    CoA,
    /// Pilot report page
    Pilot,
    Unknown,
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageType::CoA => write!(f, "CoA"),
            PageType::Pilot => write!(f, "Pilot"),
            PageType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Phrase sets used to tag pages and to detect document headers.
///
/// `header_phrases` drives header-delimited grouping and is kept separate
/// from `coa_phrases` so the two filters can be tuned independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub coa_phrases: Vec<String>,
    pub pilot_keywords: Vec<String>,
    pub header_phrases: Vec<String>,
}

pub const DEFAULT_COA_PHRASES: &[&str] = &["Certificate of Analysis", "Specification Sheet"];
pub const DEFAULT_PILOT_KEYWORDS: &[&str] = &["PILOT"];

impl Default for Vocabulary {
    fn default() -> Self {
        let coa: Vec<String> = DEFAULT_COA_PHRASES.iter().map(|s| s.to_string()).collect();
        Self {
            header_phrases: coa.clone(),
            coa_phrases: coa,
            pilot_keywords: DEFAULT_PILOT_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_str()))
}

impl Vocabulary {
    /// Tag a page: CoA phrases first, then Pilot keywords, else Unknown.
    pub fn classify(&self, text: &str) -> PageType {
        if contains_any(text, &self.coa_phrases) {
            PageType::CoA
        } else if contains_any(text, &self.pilot_keywords) {
            PageType::Pilot
        } else {
            PageType::Unknown
        }
    }

    /// Whether the page opens a new header-delimited document.
    pub fn is_header(&self, text: &str) -> bool {
        contains_any(text, &self.header_phrases)
    }
}

/// Classify with the default vocabulary
pub fn classify(text: &str) -> PageType {
    Vocabulary::default().classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Certificate of Analysis\nLot 42", PageType::CoA)]
    #[case("Product Specification Sheet", PageType::CoA)]
    #[case("PILOT training data", PageType::Pilot)]
    #[case("Invoice #1234", PageType::Unknown)]
    #[case("", PageType::Unknown)]
    fn test_classify_default_vocabulary(#[case] text: &str, #[case] expected: PageType) {
        assert_eq!(classify(text), expected);
    }

    #[test]
    fn test_coa_wins_over_pilot() {
        assert_eq!(
            classify("PILOT batch - Certificate of Analysis"),
            PageType::CoA
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(classify("certificate of analysis"), PageType::Unknown);
        assert_eq!(classify("pilot run"), PageType::Unknown);
    }

    #[test]
    fn test_header_filter_is_independent() {
        let vocab = Vocabulary {
            header_phrases: vec!["Certificate of Analysis".to_string()],
            ..Vocabulary::default()
        };
        assert!(vocab.is_header("Certificate of Analysis"));
        assert!(!vocab.is_header("Specification Sheet"));
        assert_eq!(vocab.classify("Specification Sheet"), PageType::CoA);
    }

    #[test]
    fn test_page_type_display() {
        assert_eq!(PageType::CoA.to_string(), "CoA");
        assert_eq!(PageType::Pilot.to_string(), "Pilot");
        assert_eq!(PageType::Unknown.to_string(), "Unknown");
    }
}
