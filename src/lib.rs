//! xcsweep - Find unused assets and Swift declarations in Xcode projects
//!
//! # Architecture
//!
//! A batch run goes through these stages:
//! 1. **File Discovery** - Find `.swift`, `.storyboard`, `.xib` and `.plist`
//!    files and the asset sets inside `.xcassets` catalogs
//! 2. **Catalog Extraction** - One declared item per asset set
//! 3. **Usage Scanning** - Literal references per format, driven by a rule
//!    table, plus Swift declarations, in parallel
//! 4. **Exclusion** - Protect-lists and keep-regexes remove items up front
//! 5. **Resolution** - Exact-name lookup partitions items into used/unused
//! 6. **Reporting** - Terminal, text or JSON output
//!
//! Names built at runtime (`UIImage(named: "icon_\(i)")`) cannot be matched.
//! They are collected as dynamic references and shown next to the results
//! instead of being guessed at.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod inventory;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod watch;

pub use analysis::{Confidence, ExclusionFilter, Resolver, ScanOutcome, ScanResult, UnusedAnalyzer};
pub use catalog::CatalogExtractor;
pub use config::Config;
pub use discovery::{FileFinder, FileKind, SourceFile};
pub use error::ScanError;
pub use inventory::{DeclaredItem, ScanIndex, UsageIndex, UsageOccurrence};
pub use parser::{DeclarationExtractor, RuleTable};
pub use report::{ReportFormat, Reporter};
pub use scanner::UsageScanner;
