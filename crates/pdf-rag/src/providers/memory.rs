//! In-process vector store keyed by chunk id

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::DocumentChunk;

use super::vector_store::{ChunkRecord, StoreStats, VectorStoreProvider};

/// Chunk store backed by a concurrent map
pub struct InMemoryVectorStore {
    collection_name: String,
    preview_chars: usize,
    records: DashMap<String, ChunkRecord>,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new(collection_name: impl Into<String>, preview_chars: usize) -> Self {
        Self {
            collection_name: collection_name.into(),
            preview_chars,
            records: DashMap::new(),
        }
    }

    /// Create from config
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.storage.collection_name.clone(),
            config.chunking.preview_chars,
        )
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn add_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        let mut inserted = 0;
        for chunk in chunks {
            match self.records.entry(chunk.chunk_id.clone()) {
                Entry::Occupied(_) => {
                    tracing::debug!("[{}] Chunk {} already stored", self.collection_name, chunk.chunk_id);
                }
                Entry::Vacant(slot) => {
                    slot.insert(ChunkRecord::from_chunk(chunk, self.preview_chars));
                    inserted += 1;
                }
            }
        }

        tracing::info!(
            "[{}] Added {} of {} chunks",
            self.collection_name,
            inserted,
            chunks.len()
        );
        Ok(inserted)
    }

    async fn get(&self, id: &str) -> Result<Option<ChunkRecord>> {
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    async fn delete_by_document(&self, document_name: &str) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|_, record| {
            record.metadata.get("pdf_name").and_then(|v| v.as_str()) != Some(document_name)
        });
        Ok(before - self.records.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    async fn clear(&self) -> Result<()> {
        self.records.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            total_documents: self.records.len(),
            collection_name: self.collection_name.clone(),
        })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(doc: &str, page: u32, position: usize, text: &str) -> DocumentChunk {
        DocumentChunk::new(
            text.to_string(),
            doc.to_string(),
            page,
            "Introduction/General".to_string(),
            position,
        )
    }

    #[tokio::test]
    async fn test_readding_same_ids_is_idempotent() {
        let store = InMemoryVectorStore::new("pdf_documents", 200);
        let chunks = vec![chunk("a.pdf", 1, 0, "One."), chunk("a.pdf", 1, 1, "Two.")];

        assert_eq!(store.add_chunks(&chunks).await.unwrap(), 2);
        assert_eq!(store.add_chunks(&chunks).await.unwrap(), 0);
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_record_contents() {
        let store = InMemoryVectorStore::new("pdf_documents", 3);
        let c = chunk("a.pdf", 4, 2, "Hello there.");
        store.add_chunks(std::slice::from_ref(&c)).await.unwrap();

        let record = store.get(&c.chunk_id).await.unwrap().unwrap();
        assert_eq!(record.text, "Hello there.");
        assert_eq!(record.metadata["pdf_name"], "a.pdf");
        assert_eq!(record.metadata["page_number"], 4);
        assert_eq!(record.metadata["heading"], "Introduction/General");
        assert_eq!(record.metadata["text_preview"], "Hel");
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = InMemoryVectorStore::new("pdf_documents", 200);
        store
            .add_chunks(&[chunk("a.pdf", 1, 0, "A."), chunk("b.pdf", 1, 0, "B."), chunk("b.pdf", 2, 0, "C.")])
            .await
            .unwrap();

        assert_eq!(store.delete_by_document("b.pdf").await.unwrap(), 2);
        assert_eq!(store.stats().await.unwrap().total_documents, 1);

        store.clear().await.unwrap();
        assert!(store.is_empty().await.unwrap());
        assert_eq!(store.add_chunks(&[]).await.unwrap(), 0);
    }
}
