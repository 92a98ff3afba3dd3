use crate::error::ScanError;
use crate::inventory::{DynamicReference, UsageOccurrence};
use std::path::Path;

/// Result of scanning one file for usages
#[derive(Debug, Default)]
pub struct FileExtraction {
    /// Literal references found in the file
    pub usages: Vec<UsageOccurrence>,

    /// Lookups the scanner could see but not resolve
    pub dynamic_references: Vec<DynamicReference>,
}

impl FileExtraction {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Trait for format-specific usage parsers
pub trait Parser {
    /// Extract usages from a file's text
    fn parse(&self, path: &Path, contents: &str) -> Result<FileExtraction, ScanError>;
}

/// Byte offset to 1-based line lookup
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(contents: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(contents.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(next) => next,
        }
    }
}
