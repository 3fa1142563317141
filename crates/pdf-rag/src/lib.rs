//! pdf-rag: PDF ingestion for retrieval-augmented question answering
//!
//! Splits PDF pages into paragraph chunks that carry page, heading and
//! position provenance, with deterministic ids so stores can deduplicate
//! re-ingested documents. Many documents are processed concurrently with
//! per-document failure isolation.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use ingestion::{DocumentProcessor, HeadingClassifier};
pub use processing::{BatchReport, ProcessingWorker};
pub use types::DocumentChunk;
