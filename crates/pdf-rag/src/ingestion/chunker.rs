//! Paragraph chunking with heading and position tracking

use std::collections::HashSet;

use crate::config::ChunkingConfig;
use crate::types::DocumentChunk;

use super::heading::HeadingCandidate;

/// Splits one page into paragraph chunks
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    /// Heading used until the first detected heading on a page
    default_heading: String,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new(&ChunkingConfig::default())
    }
}

impl ChunkBuilder {
    /// Create a new chunk builder
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            default_heading: config.default_heading.clone(),
        }
    }

    /// Chunk one page of text.
    ///
    /// Paragraphs are separated by blank lines. A paragraph whose trimmed text
    /// equals a detected heading moves the heading cursor and is not emitted.
    /// Every other paragraph becomes a chunk whose position is its index in
    /// the page's paragraph sequence, so positions skip over heading paragraphs.
    pub fn build(
        &self,
        page_text: &str,
        page_number: u32,
        document_name: &str,
        headings: &[HeadingCandidate],
    ) -> Vec<DocumentChunk> {
        let heading_texts: HashSet<&str> = headings.iter().map(|h| h.text.as_str()).collect();
        let mut current_heading = self.default_heading.as_str();
        let mut chunks = Vec::new();

        for (position, paragraph) in split_paragraphs(page_text).enumerate() {
            if heading_texts.contains(paragraph) {
                current_heading = paragraph;
                continue;
            }

            chunks.push(DocumentChunk::new(
                paragraph.to_string(),
                document_name.to_string(),
                page_number,
                current_heading.to_string(),
                position,
            ));
        }

        chunks
    }
}

/// Blank-line separated paragraphs, trimmed, empty ones dropped
fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}
