//! Provider abstractions for the storage side of the pipeline

pub mod memory;
pub mod vector_store;

pub use memory::InMemoryVectorStore;
pub use vector_store::{ChunkRecord, StoreStats, VectorStoreProvider};
