use crate::analysis::{Confidence, ScanOutcome};
use crate::inventory::{DeclaredItem, DynamicReference};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, outcome: &ScanOutcome) -> Result<()> {
        let json = self.render(outcome)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn render(&self, outcome: &ScanOutcome) -> Result<String> {
        let report = JsonReport::from_outcome(outcome);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    unused_assets: Vec<JsonItem<'a>>,
    unused_declarations: Vec<JsonItem<'a>>,
    unused_files: &'a [PathBuf],
    dynamic_references: &'a [DynamicReference],
    warnings: Vec<String>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    name: &'a str,
    kind: &'static str,
    path: String,
    line: usize,
    confidence: Confidence,
}

#[derive(Serialize)]
struct JsonSummary {
    unused_assets: usize,
    unused_declarations: usize,
    unused_files: usize,
    used_assets: usize,
    used_declarations: usize,
    excluded: usize,
    warnings: usize,
}

impl<'a> JsonReport<'a> {
    fn from_outcome(outcome: &'a ScanOutcome) -> Self {
        let result = &outcome.result;
        let item = |i: &'a DeclaredItem| JsonItem {
            name: &i.identifier,
            kind: i.kind.display_name(),
            path: i.path().to_string_lossy().to_string(),
            line: i.line,
            confidence: result.confidence_of(i),
        };

        Self {
            version: "1.0",
            unused_assets: result.unused_assets.iter().map(item).collect(),
            unused_declarations: result.unused_declarations.iter().map(item).collect(),
            unused_files: &result.unused_files,
            dynamic_references: &result.dynamic_references,
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
            summary: JsonSummary {
                unused_assets: result.unused_assets.len(),
                unused_declarations: result.unused_declarations.len(),
                unused_files: result.unused_files.len(),
                used_assets: result.used_assets.len(),
                used_declarations: result.used_declarations.len(),
                excluded: result.excluded.len(),
                warnings: outcome.warnings.len(),
            },
        }
    }
}
