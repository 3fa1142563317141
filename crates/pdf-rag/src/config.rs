//! Configuration for the ingestion pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Multi-document processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
    /// Chunk construction configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Heading detection configuration
    #[serde(default)]
    pub headings: HeadingConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file '{}': {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check preconditions that would make the whole run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.processing.max_workers == 0 {
            return Err(Error::config("processing.max_workers must be at least 1"));
        }
        if self.chunking.default_heading.trim().is_empty() {
            return Err(Error::config("chunking.default_heading must not be empty"));
        }
        if self.headings.max_line_length == 0 {
            return Err(Error::config("headings.max_line_length must be at least 1"));
        }
        Ok(())
    }
}

/// Multi-document processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Maximum number of documents processed at the same time
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_max_workers() -> usize { 4 }

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

/// Chunk construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Heading attached to paragraphs that precede any detected heading on their page
    #[serde(default = "default_heading")]
    pub default_heading: String,
    /// Length of the text preview handed to the vector store (characters)
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_heading() -> String { crate::types::DEFAULT_HEADING.to_string() }
fn default_preview_chars() -> usize { 200 }

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_heading: default_heading(),
            preview_chars: default_preview_chars(),
        }
    }
}

/// Heading detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingConfig {
    /// Lines of this many characters or more are never headings
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Additional regular expressions that mark a line as a heading
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_max_line_length() -> usize { 100 }

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            extra_patterns: Vec::new(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the vector collection chunks are written to
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    /// Directory scanned for PDFs when no input paths are given
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

fn default_collection_name() -> String { "pdf_documents".to_string() }
fn default_upload_dir() -> PathBuf { PathBuf::from("./data/uploads") }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            collection_name: default_collection_name(),
            upload_dir: default_upload_dir(),
        }
    }
}
