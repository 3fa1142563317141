//! Document ingestion: page extraction, heading detection and paragraph chunking

mod chunker;
pub mod extractor;
mod heading;
mod processor;

pub use chunker::ChunkBuilder;
pub use extractor::{cleanup_page_text, LopdfExtractor, PageExtractor, PageSource};
pub use heading::{is_heading, HeadingCandidate, HeadingClassifier, MAX_HEADING_LENGTH};
pub use processor::DocumentProcessor;
