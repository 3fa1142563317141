//! Chunk records with page and heading provenance for citations

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

/// Heading used for paragraphs that precede every detected heading on their page
pub const DEFAULT_HEADING: &str = "Introduction/General";

/// Name of the chunk id derivation.
///
/// Stored ids are only comparable when produced by the same scheme. Bump this
/// whenever the hash input, the hash function or [`CHUNK_ID_LEN`] changes.
pub const CHUNK_ID_SCHEME: &str = "sha256-v1";

/// Number of hex characters kept from the digest
pub const CHUNK_ID_LEN: usize = 12;

/// Number of leading characters of the chunk text that feed the id
pub const CHUNK_ID_TEXT_PREFIX: usize = 50;

const FIELD_SEPARATOR: &[u8] = b"\x1f";

/// Numeric side data for a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkAttributes {
    /// Number of characters in the text
    pub char_count: usize,
    /// Number of whitespace-separated words
    pub word_count: usize,
    /// Zero-based index within the page's paragraph sequence
    pub position: usize,
}

impl ChunkAttributes {
    /// Measure a paragraph at a given position
    pub fn measure(text: &str, position: usize) -> Self {
        Self {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            position,
        }
    }
}

/// A paragraph-level unit of text extracted from one PDF page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Paragraph text (never empty)
    pub text: String,
    /// Final path component of the originating file
    pub source_document_name: String,
    /// 1-based page number
    pub page_number: u32,
    /// Nearest preceding heading on the page, or the default heading
    pub heading: String,
    /// Deterministic fingerprint, see [`chunk_fingerprint`]
    pub chunk_id: String,
    pub attributes: ChunkAttributes,
}

impl DocumentChunk {
    /// Create a chunk, deriving its id from provenance and content
    pub fn new(
        text: String,
        source_document_name: String,
        page_number: u32,
        heading: String,
        position: usize,
    ) -> Self {
        let chunk_id = chunk_fingerprint(&source_document_name, page_number, position, &text);
        let attributes = ChunkAttributes::measure(&text, position);
        Self {
            text,
            source_document_name,
            page_number,
            heading,
            chunk_id,
            attributes,
        }
    }

    /// Position within the page's paragraph sequence
    pub fn position(&self) -> usize {
        self.attributes.position
    }

    /// Leading characters of the text, cut on a character boundary
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    /// Format source for display
    pub fn format_citation(&self) -> String {
        format!(
            "{}, Page {}, Section: {}",
            self.source_document_name, self.page_number, self.heading
        )
    }

    /// Convert to vector metadata for storage
    pub fn to_vector_metadata(&self, preview_chars: usize) -> HashMap<String, serde_json::Value> {
        let mut meta = HashMap::new();
        meta.insert("pdf_name".to_string(), serde_json::json!(self.source_document_name));
        meta.insert("page_number".to_string(), serde_json::json!(self.page_number));
        meta.insert("heading".to_string(), serde_json::json!(self.heading));
        meta.insert("text_preview".to_string(), serde_json::json!(self.preview(preview_chars)));
        meta.insert("char_count".to_string(), serde_json::json!(self.attributes.char_count));
        meta.insert("word_count".to_string(), serde_json::json!(self.attributes.word_count));
        meta.insert("position".to_string(), serde_json::json!(self.attributes.position));
        meta.insert("chunk_id_scheme".to_string(), serde_json::json!(CHUNK_ID_SCHEME));
        meta
    }
}

/// Derive the chunk id for scheme [`CHUNK_ID_SCHEME`].
///
/// SHA-256 over `document_name`, `page_number`, `position` and the first
/// [`CHUNK_ID_TEXT_PREFIX`] characters of `text`, joined with U+001F, hex
/// encoded and cut to [`CHUNK_ID_LEN`] characters.
pub fn chunk_fingerprint(document_name: &str, page_number: u32, position: usize, text: &str) -> String {
    let prefix: String = text.chars().take(CHUNK_ID_TEXT_PREFIX).collect();

    let mut hasher = Sha256::new();
    hasher.update(document_name.as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(page_number.to_string().as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(position.to_string().as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(prefix.as_bytes());

    let mut id = hex::encode(hasher.finalize());
    id.truncate(CHUNK_ID_LEN);
    id
}

/// Final path component of `path`, treating both `/` and `\` as separators
pub fn document_name(path: &Path) -> String {
    let raw = path.to_string_lossy();
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}
