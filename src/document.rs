//! Per-file page model derived from OCR text

use crate::classify::{PageType, Vocabulary};
use crate::identifier::Identifier;

/// A single page of a source document
#[derive(Debug, Clone)]
pub struct Page {
    /// Zero-based index within the source PDF
    pub index: usize,
    /// OCR output, possibly empty
    pub text: String,
    pub page_type: PageType,
    /// Whether the header filter marks this page as a document start
    pub is_header: bool,
    pub identifier: Option<Identifier>,
}

/// Ordered, immutable sequence of pages loaded from one PDF
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    /// Derive every page attribute from the OCR texts, in page order.
    pub fn from_texts<I, S>(texts: I, vocabulary: &Vocabulary) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let text = text.into();
                Page {
                    index,
                    page_type: vocabulary.classify(&text),
                    is_header: vocabulary.is_header(&text),
                    identifier: Identifier::from_text(&text),
                    text,
                }
            })
            .collect();

        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Indices of header pages, ascending
    pub fn header_indices(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| p.is_header)
            .map(|p| p.index)
            .collect()
    }
}
