//! Vector store provider trait for handing chunks to the retrieval index

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::types::DocumentChunk;

/// What the vector store receives for one chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Idempotency key
    pub id: String,
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChunkRecord {
    /// Build the record for a chunk with a text preview of `preview_chars`
    pub fn from_chunk(chunk: &DocumentChunk, preview_chars: usize) -> Self {
        Self {
            id: chunk.chunk_id.clone(),
            text: chunk.text.clone(),
            metadata: chunk.to_vector_metadata(preview_chars),
        }
    }
}

/// Collection statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_documents: usize,
    pub collection_name: String,
}

/// Trait for chunk storage
///
/// Implementations must treat `ChunkRecord::id` as a dedup key: adding a
/// chunk whose id is already stored must not create a second entry.
///
/// Implementations:
/// - `InMemoryVectorStore`: process-local map
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Add chunks, returning how many ids were not stored before
    async fn add_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize>;

    /// Fetch a stored record by id
    async fn get(&self, id: &str) -> Result<Option<ChunkRecord>>;

    /// Remove every chunk of one source document
    async fn delete_by_document(&self, document_name: &str) -> Result<usize>;

    /// Get total number of chunks stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Remove everything
    async fn clear(&self) -> Result<()>;

    /// Collection statistics
    async fn stats(&self) -> Result<StoreStats>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
