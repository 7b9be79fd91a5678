//! Shared fixtures for integration tests

#![allow(dead_code)]

use qpdf::{QPdf, QPdfArray, QPdfScalar};
use scan_splitter::{Error, Result, TextExtractor};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const TAG_PREFIX: &[u8] = b"%scan-id:";

/// Build a minimal valid PDF with `pages` blank pages.
///
/// `tag` is embedded as a comment line so [`ScriptedExtractor`] can tell
/// fixtures apart.
pub fn build_pdf(pages: usize, tag: &str) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offsets = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n");
    out.extend_from_slice(TAG_PREFIX);
    out.extend_from_slice(tag.as_bytes());
    out.push(b'\n');

    let mut push_obj = |out: &mut Vec<u8>, body: String| {
        let num = offsets.len() + 1;
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", num, body).as_bytes());
    };

    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();
    push_obj(&mut out, "<< /Type /Catalog /Pages 2 0 R >>".to_string());
    push_obj(
        &mut out,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages
        ),
    );

    for i in 0..pages {
        let content_obj = 4 + 2 * i;
        push_obj(
            &mut out,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} 792] /Contents {} 0 R >>",
                600 + i,
                content_obj
            ),
        );
        let stream = format!("0 0 m {} 10 l S", 10 + i);
        push_obj(
            &mut out,
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ),
        );
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.extend_from_slice(xref.as_bytes());
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

/// Write a fixture PDF into `dir` and return its path
pub fn write_pdf(dir: &Path, name: &str, pages: usize, tag: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages, tag)).expect("write fixture");
    path
}

/// MediaBox width of every page, in page order.
///
/// [`build_pdf`] gives page `i` a width of `600 + i`, so this identifies
/// which source pages ended up in an output.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let data = std::fs::read(path).expect("read output");
    page_widths_of(&data)
}

pub fn page_widths_of(pdf: &[u8]) -> Vec<i64> {
    let doc = QPdf::read_from_memory(pdf).expect("open pdf");
    doc.get_pages()
        .expect("list pages")
        .iter()
        .map(|page| {
            let media_box = QPdfArray::from(page.get("/MediaBox").expect("MediaBox"));
            QPdfScalar::from(media_box.get(2).expect("MediaBox width")).as_i64()
        })
        .collect()
}

fn read_tag(pdf: &[u8]) -> Option<String> {
    let start = pdf
        .windows(TAG_PREFIX.len())
        .position(|w| w == TAG_PREFIX)?
        + TAG_PREFIX.len();
    let end = start + pdf[start..].iter().position(|&b| b == b'\n')?;
    Some(String::from_utf8_lossy(&pdf[start..end]).to_string())
}

/// Stand-in for OCR: returns canned page texts keyed by the fixture tag.
/// Unknown tags fail like a broken OCR engine would.
#[derive(Default)]
pub struct ScriptedExtractor {
    scripts: HashMap<String, Vec<String>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: &str, texts: &[&str]) -> Self {
        self.scripts.insert(
            tag.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

impl TextExtractor for ScriptedExtractor {
    fn extract_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>> {
        let tag = read_tag(pdf_bytes).unwrap_or_default();
        self.scripts.get(&tag).cloned().ok_or_else(|| Error::Ocr {
            page: 1,
            reason: format!("no script for {:?}", tag),
        })
    }

    fn backend_name(&self) -> &str {
        "scripted"
    }
}

/// Records how many extractions run at the same time
pub struct CountingExtractor {
    inner: ScriptedExtractor,
    hold: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl CountingExtractor {
    pub fn new(inner: ScriptedExtractor, hold: Duration) -> Self {
        Self {
            inner,
            hold,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Highest number of concurrent `extract_texts` calls seen
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl TextExtractor for CountingExtractor {
    fn extract_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.hold);
        let result = self.inner.extract_texts(pdf_bytes);
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn backend_name(&self) -> &str {
        "counting"
    }
}

/// Panics for one fixture tag, delegates otherwise
pub struct PanickingExtractor {
    inner: ScriptedExtractor,
    panic_on: String,
}

impl PanickingExtractor {
    pub fn new(inner: ScriptedExtractor, panic_on: &str) -> Self {
        Self {
            inner,
            panic_on: panic_on.to_string(),
        }
    }
}

impl TextExtractor for PanickingExtractor {
    fn extract_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>> {
        if read_tag(pdf_bytes).as_deref() == Some(self.panic_on.as_str()) {
            panic!("extractor crashed on {}", self.panic_on);
        }
        self.inner.extract_texts(pdf_bytes)
    }

    fn backend_name(&self) -> &str {
        "panicking"
    }
}
