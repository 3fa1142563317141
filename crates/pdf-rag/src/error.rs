//! Error types for the ingestion pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (fatal precondition, never recovered)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input path does not exist or is not a file
    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// PDF could not be opened or parsed
    #[error("Failed to open PDF '{document}': {message}")]
    PdfOpen { document: String, message: String },

    /// Text extraction failed for a single page
    #[error("Failed to extract page {page} of '{document}': {message}")]
    PageExtraction {
        document: String,
        page: u32,
        message: String,
    },

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file syntax error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a PDF open error
    pub fn pdf_open(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PdfOpen {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create a page extraction error
    pub fn page_extraction(document: impl Into<String>, page: u32, message: impl Into<String>) -> Self {
        Self::PageExtraction {
            document: document.into(),
            page,
            message: message.into(),
        }
    }

    /// Create a vector store error
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error must abort the whole run instead of a single document
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
