//! Document processing: extract, detect headings, chunk, page by page

use std::path::Path;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::types::{document_name, DocumentChunk};

use super::chunker::ChunkBuilder;
use super::extractor::{LopdfExtractor, PageExtractor, PageSource};
use super::heading::HeadingClassifier;

/// Turns one PDF into its ordered chunk list
#[derive(Clone)]
pub struct DocumentProcessor {
    extractor: Arc<dyn PageExtractor>,
    classifier: HeadingClassifier,
    builder: ChunkBuilder,
}

impl DocumentProcessor {
    /// Create a processor that reads PDFs with lopdf
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Self::with_extractor(config, Arc::new(LopdfExtractor::new()))
    }

    /// Create a processor with a custom page extractor
    pub fn with_extractor(config: &PipelineConfig, extractor: Arc<dyn PageExtractor>) -> Result<Self> {
        Ok(Self {
            extractor,
            classifier: HeadingClassifier::new(&config.headings)?,
            builder: ChunkBuilder::new(&config.chunking),
        })
    }

    /// Process one document.
    ///
    /// Only a missing input file is returned as an error. Failures while
    /// opening or reading the PDF are logged and the chunks of the pages read
    /// so far are returned instead.
    pub fn process(&self, path: &Path) -> Result<Vec<DocumentChunk>> {
        if !path.is_file() {
            return Err(Error::DocumentNotFound(path.to_path_buf()));
        }

        let name = document_name(path);
        let mut chunks = Vec::new();

        let mut source = match self.extractor.open(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("[{}] Error processing document: {}", name, e);
                return Ok(chunks);
            }
        };

        if let Err(e) = self.process_pages(&name, source.as_mut(), &mut chunks) {
            tracing::error!(
                "[{}] Error processing document: {} (keeping {} chunks from earlier pages)",
                name,
                e,
                chunks.len()
            );
        }

        tracing::info!("[{}] Produced {} chunks", name, chunks.len());
        Ok(chunks)
    }

    fn process_pages(
        &self,
        name: &str,
        source: &mut dyn PageSource,
        chunks: &mut Vec<DocumentChunk>,
    ) -> Result<()> {
        for page_number in 1..=source.page_count() {
            let text = source.page_text(page_number)?;
            if text.trim().is_empty() {
                tracing::debug!("[{}] Page {} has no text, skipping", name, page_number);
                continue;
            }

            let headings = self.classifier.detect(&text);
            chunks.extend(self.builder.build(&text, page_number, name, &headings));
        }
        Ok(())
    }
}
