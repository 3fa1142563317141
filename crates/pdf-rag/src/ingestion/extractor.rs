//! Per-page PDF text extraction

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::document_name;

/// Opens documents for page-by-page text extraction
pub trait PageExtractor: Send + Sync {
    /// Open the document at `path`
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>>;
}

/// An opened, page-ordered document
pub trait PageSource: Send {
    /// Number of pages in the document
    fn page_count(&self) -> u32;

    /// Plain text of a 1-based page, possibly empty
    fn page_text(&mut self, page_number: u32) -> Result<String>;
}

/// Extractor backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for LopdfExtractor {
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>> {
        let name = document_name(path);
        let doc = lopdf::Document::load(path)
            .map_err(|e| Error::pdf_open(&name, format!("Failed to load PDF: {}", e)))?;

        if doc.is_encrypted() {
            return Err(Error::pdf_open(&name, "PDF is encrypted"));
        }

        let pages = doc.get_pages();
        tracing::debug!("[{}] Opened PDF with {} pages", name, pages.len());

        Ok(Box::new(LopdfPages { name, doc, pages }))
    }
}

struct LopdfPages {
    name: String,
    doc: lopdf::Document,
    pages: BTreeMap<u32, lopdf::ObjectId>,
}

impl PageSource for LopdfPages {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&mut self, page_number: u32) -> Result<String> {
        if !self.pages.contains_key(&page_number) {
            return Err(Error::page_extraction(&self.name, page_number, "no such page"));
        }
        let raw = self
            .doc
            .extract_text(&[page_number])
            .map_err(|e| Error::page_extraction(&self.name, page_number, e.to_string()))?;
        Ok(cleanup_page_text(&raw))
    }
}

/// Normalize extracted text without disturbing blank-line paragraph breaks
pub fn cleanup_page_text(text: &str) -> String {
    let text = text
        .replace('\0', "")
        .replace('\u{00A0}', " ") // Non-breaking space
        .replace('\u{00AD}', "") // Soft hyphen
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl");

    text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}
