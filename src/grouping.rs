//! Page grouping
//!
//! Two independent partitions are computed over the same document:
//!
//! - header-delimited: contiguous spans starting at each header page,
//!   keeping only pages of the member type
//! - identifier-keyed: pages bucketed by their extracted quotation key
//!
//! A page may land in both, in one, or in neither.

use crate::classify::PageType;
use crate::document::Document;
use crate::identifier::{IdentifierKey, IdentifierKeying};
use std::collections::HashMap;
use std::ops::Range;

/// One header-delimited run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    /// 1-based position among header groups
    pub sequence: usize,
    /// `[header, next header)` or `[last header, page count)`
    pub span: Range<usize>,
    /// Pages in `span` whose type equals the member type
    pub pages: Vec<usize>,
}

/// Pages sharing one identifier key, in encounter order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierGroup {
    pub key: IdentifierKey,
    pub pages: Vec<usize>,
}

/// Split the document into runs starting at each header page.
///
/// Returns no groups when the document has no header pages.
pub fn group_by_header(document: &Document, member_type: PageType) -> Vec<HeaderGroup> {
    let headers = document.header_indices();
    let pages = document.pages();

    headers
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = headers.get(i + 1).copied().unwrap_or(pages.len());
            let members = pages[start..end]
                .iter()
                .filter(|p| p.page_type == member_type)
                .map(|p| p.index)
                .collect();

            HeaderGroup {
                sequence: i + 1,
                span: start..end,
                pages: members,
            }
        })
        .collect()
}

/// Bucket pages by identifier key.
///
/// Groups are ordered by the first page that produced their key. Pages
/// without a quotation number are left out.
pub fn group_by_identifier(document: &Document, keying: IdentifierKeying) -> Vec<IdentifierGroup> {
    let mut groups: Vec<IdentifierGroup> = Vec::new();
    let mut positions: HashMap<IdentifierKey, usize> = HashMap::new();

    for page in document.pages() {
        let Some(id) = page.identifier.as_ref() else {
            continue;
        };
        let key = keying.key_for(id);

        match positions.get(&key) {
            Some(&pos) => groups[pos].pages.push(page.index),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(IdentifierGroup {
                    key,
                    pages: vec![page.index],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Vocabulary;
    use pretty_assertions::assert_eq;

    fn doc(texts: &[&str]) -> Document {
        Document::from_texts(texts.iter().copied(), &Vocabulary::default())
    }

    #[test]
    fn test_header_groups_drop_non_member_pages() {
        // headers at 0 and 5, CoA pages at {0, 1, 5, 6, 7}, 9 pages total
        let texts = [
            "Certificate of Analysis",
            "Specification Sheet continued",
            "PILOT",
            "",
            "misc",
            "Certificate of Analysis",
            "Specification Sheet",
            "Specification Sheet",
            "trailing notes",
        ];
        let vocab = Vocabulary {
            header_phrases: vec!["Certificate of Analysis".to_string()],
            ..Vocabulary::default()
        };
        let document = Document::from_texts(texts, &vocab);

        let groups = group_by_header(&document, PageType::CoA);

        assert_eq!(
            groups,
            vec![
                HeaderGroup {
                    sequence: 1,
                    span: 0..5,
                    pages: vec![0, 1],
                },
                HeaderGroup {
                    sequence: 2,
                    span: 5..9,
                    pages: vec![5, 6, 7],
                },
            ]
        );
    }

    #[test]
    fn test_no_headers_no_groups() {
        let document = doc(&["PILOT", "", "Quotation No.: A1"]);
        assert!(group_by_header(&document, PageType::CoA).is_empty());
    }

    #[test]
    fn test_header_group_can_be_empty_with_custom_member_type() {
        let document = doc(&["Certificate of Analysis", "notes"]);
        let groups = group_by_header(&document, PageType::Pilot);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].pages.is_empty());
    }

    #[test]
    fn test_identifier_groups_preserve_order() {
        let document = doc(&[
            "Quotation No.: A1 Version: 2",
            "Quotation No.: B7",
            "no identifier",
            "Quotation No.: A1 Version: 2",
            "Quotation No.: B7 Version: 1",
        ]);

        let groups = group_by_identifier(&document, IdentifierKeying::NumberAndVersion);

        assert_eq!(
            groups,
            vec![
                IdentifierGroup {
                    key: IdentifierKey {
                        quotation_number: "A1".to_string(),
                        version: Some("2".to_string()),
                    },
                    pages: vec![0, 3],
                },
                IdentifierGroup {
                    key: IdentifierKey {
                        quotation_number: "B7".to_string(),
                        version: Some("1".to_string()),
                    },
                    pages: vec![1, 4],
                },
            ]
        );
    }

    #[test]
    fn test_identifier_versions_split_groups() {
        let document = doc(&[
            "Quotation No.: A1 Version: 1",
            "Quotation No.: A1 Version: 2",
        ]);
        assert_eq!(
            group_by_identifier(&document, IdentifierKeying::NumberAndVersion).len(),
            2
        );
        let by_number = group_by_identifier(&document, IdentifierKeying::NumberOnly);
        assert_eq!(by_number.len(), 1);
        assert_eq!(by_number[0].pages, vec![0, 1]);
    }

    #[test]
    fn test_page_in_both_partitions() {
        let document = doc(&["Certificate of Analysis\nQuotation No.: Z1"]);
        let headers = group_by_header(&document, PageType::CoA);
        let ids = group_by_identifier(&document, IdentifierKeying::NumberAndVersion);
        assert_eq!(headers[0].pages, vec![0]);
        assert_eq!(ids[0].pages, vec![0]);
    }

    #[test]
    fn test_groups_reference_valid_indices() {
        let document = doc(&[
            "Certificate of Analysis",
            "Quotation No.: A1",
            "Certificate of Analysis",
        ]);
        let total = document.page_count();
        for g in group_by_header(&document, PageType::CoA) {
            assert!(g.pages.iter().all(|&p| p < total));
        }
        for g in group_by_identifier(&document, IdentifierKeying::NumberAndVersion) {
            assert!(g.pages.iter().all(|&p| p < total));
        }
    }
}
