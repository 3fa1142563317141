//! Heuristic heading detection over single lines of page text

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

use crate::config::HeadingConfig;
use crate::error::{Error, Result};

/// Lines this long (in characters) or longer are body text
pub const MAX_HEADING_LENGTH: usize = 100;

static HEADING_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        // "Chapter 3", "Section 12 Scope"
        r"^(?:Chapter|Section)\s+\d+\b",
        // "3.2 Methodology"
        r"^\d+\.\d+\s+",
        // "CHAPTER ONE", "RESULTS"
        r"^[A-Z][A-Z\s]{2,}$",
        // "Key findings:"
        r"^.{0,50}:$",
    ])
    .expect("built-in heading patterns are valid")
});

/// Whether a trimmed line looks like a structural heading
pub fn is_heading(line: &str) -> bool {
    line.chars().count() < MAX_HEADING_LENGTH && HEADING_PATTERNS.is_match(line)
}

/// A line detected as a heading on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingCandidate {
    /// Trimmed line text
    pub text: String,
    /// Zero-based line index within the page text
    pub line_number: usize,
}

/// Heading classifier with configurable length limit and extra patterns
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    max_line_length: usize,
    extra: Vec<Regex>,
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self {
            max_line_length: MAX_HEADING_LENGTH,
            extra: Vec::new(),
        }
    }
}

impl HeadingClassifier {
    /// Build a classifier, compiling the configured extra patterns
    pub fn new(config: &HeadingConfig) -> Result<Self> {
        let extra = config
            .extra_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    Error::config(format!("invalid heading pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            max_line_length: config.max_line_length,
            extra,
        })
    }

    /// Classify one line; leading and trailing whitespace is ignored
    pub fn classify(&self, line: &str) -> bool {
        let line = line.trim();
        if line.chars().count() >= self.max_line_length {
            return false;
        }
        HEADING_PATTERNS.is_match(line) || self.extra.iter().any(|re| re.is_match(line))
    }

    /// Collect heading candidates from a page's text, one per matching line
    pub fn detect(&self, page_text: &str) -> Vec<HeadingCandidate> {
        page_text
            .split('\n')
            .enumerate()
            .filter_map(|(line_number, line)| {
                let text = line.trim();
                self.classify(text).then(|| HeadingCandidate {
                    text: text.to_string(),
                    line_number,
                })
            })
            .collect()
    }
}
