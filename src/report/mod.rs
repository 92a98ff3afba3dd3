mod json;
mod terminal;
mod text;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;
pub use text::{TextReporter, UNUSED_ASSETS_FILE, UNUSED_DECLARATIONS_FILE, UNUSED_FILES_FILE};

use crate::analysis::ScanOutcome;
use miette::Result;
use std::path::PathBuf;

/// Directory the text reports go to when no output is given
pub const DEFAULT_REPORT_DIR: &str = "Reports";

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Text,
    Json,
}

impl ReportFormat {
    /// Parse a format name as written in the config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "terminal" => Some(ReportFormat::Terminal),
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Reporter for outputting scan results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    pub fn report(&self, outcome: &ScanOutcome) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new().report(outcome),
            ReportFormat::Text => {
                let dir = self
                    .output_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR));
                TextReporter::new(dir).report(outcome)
            }
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(outcome),
        }
    }
}
