//! Error taxonomy for a scan run.
//!
//! Only the pattern errors are fatal. Everything else is collected as a
//! warning on the [`ScanOutcome`](crate::analysis::ScanOutcome) and the run
//! keeps going with whatever is readable.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ScanError {
    #[error("Unreadable path {}: {reason}", .path.display())]
    #[diagnostic(code(xcsweep::unreadable_path))]
    UnreadablePath { path: PathBuf, reason: String },

    #[error("Malformed asset catalog entry {}: {reason}", .path.display())]
    #[diagnostic(
        code(xcsweep::malformed_catalog_entry),
        help("every asset set needs a Contents.json holding a JSON object")
    )]
    MalformedCatalogEntry { path: PathBuf, reason: String },

    #[error("Invalid exclusion pattern `{pattern}`")]
    #[diagnostic(
        code(xcsweep::invalid_exclusion_pattern),
        help("fix or remove the pattern; a broken keep rule could recommend deleting something you meant to keep")
    )]
    InvalidExclusionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid extraction pattern `{pattern}`")]
    #[diagnostic(code(xcsweep::invalid_extraction_pattern))]
    InvalidExtractionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ScanError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ScanError::UnreadablePath {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ScanError::MalformedCatalogEntry {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Fatal errors abort the run; the rest are reported as warnings
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidExclusionPattern { .. } | ScanError::InvalidExtractionPattern { .. }
        )
    }

    /// Path the error is about, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ScanError::UnreadablePath { path, .. } | ScanError::MalformedCatalogEntry { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}
