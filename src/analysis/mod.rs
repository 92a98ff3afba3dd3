mod exclusion;
mod pipeline;
mod resolver;

pub use exclusion::{ExclusionFilter, ExclusionRule};
pub use pipeline::{RunStats, ScanOutcome, UnusedAnalyzer};
pub use resolver::{Resolver, ScanResult};

use serde::Serialize;

/// How far an "unused" verdict can be trusted
///
/// Static matching cannot see names built at runtime. Confidence only
/// affects presentation and `--min-confidence` filtering, never whether an
/// item is classified as unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Could be reached through dynamic dispatch or a computed name
    Low,
    /// No literal reference, but some lookups could not be resolved
    Medium,
    /// No reference of any kind
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
