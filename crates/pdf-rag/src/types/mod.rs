//! Core types for the ingestion pipeline

pub mod chunk;

pub use chunk::{
    chunk_fingerprint, document_name, ChunkAttributes, DocumentChunk, CHUNK_ID_LEN,
    CHUNK_ID_SCHEME, CHUNK_ID_TEXT_PREFIX, DEFAULT_HEADING,
};
