//! Usage scanning
//!
//! Every non-catalog input is read once, on a rayon worker, and run through
//! the parser for its format. Workers return their findings; the merge into
//! the shared index happens afterwards on the calling thread, in input order.

use crate::discovery::{FileKind, SourceFile};
use crate::error::ScanError;
use crate::inventory::{DeclaredItem, FormatKind, ScanIndex};
use crate::parser::{
    DeclarationExtractor, FileExtraction, InterfaceBuilderParser, Parser, PlistParser, RuleTable,
    SwiftParser,
};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Findings of one worker for one file
#[derive(Debug, Default)]
struct FileScan {
    extraction: FileExtraction,
    declarations: Vec<DeclaredItem>,
}

/// Merged findings of a scan
#[derive(Debug, Default)]
pub struct ScanOutput {
    pub index: ScanIndex,
    /// Swift declarations, grouped by file in input order
    pub declarations: Vec<DeclaredItem>,
    pub warnings: Vec<ScanError>,
    pub files_scanned: usize,
}

/// Scans source, interface and property list files for references
pub struct UsageScanner<'a> {
    rules: &'a RuleTable,
    declarations: Option<&'a DeclarationExtractor>,
    progress: bool,
}

impl<'a> UsageScanner<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self {
            rules,
            declarations: None,
            progress: false,
        }
    }

    /// Also extract Swift declarations while each file is in memory
    pub fn with_declarations(mut self, extractor: &'a DeclarationExtractor) -> Self {
        self.declarations = Some(extractor);
        self
    }

    /// Show a progress bar on stderr
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn scan(&self, files: &[SourceFile]) -> ScanOutput {
        let targets: Vec<&SourceFile> = files.iter().filter(|f| f.kind.format().is_some()).collect();
        info!("Scanning {} files for references...", targets.len());

        let pb = self.progress_bar(targets.len());

        let results: Vec<Result<FileScan, ScanError>> = targets
            .par_iter()
            .map(|file| {
                let result = self.scan_file(file);
                pb.inc(1);
                result
            })
            .collect();

        pb.finish_and_clear();

        let mut output = ScanOutput {
            files_scanned: targets.len(),
            ..Default::default()
        };

        for result in results {
            match result {
                Ok(scan) => {
                    for usage in scan.extraction.usages {
                        output.index.record(usage);
                    }
                    output
                        .index
                        .dynamic_references
                        .extend(scan.extraction.dynamic_references);
                    output.declarations.extend(scan.declarations);
                }
                Err(e) => {
                    warn!("{}", e);
                    output.warnings.push(e);
                }
            }
        }

        output.index.dynamic_references.sort();

        debug!(
            "Indexed {} asset names, {} symbols, {} dynamic lookups",
            output.index.assets.len(),
            output.index.symbols.len(),
            output.index.dynamic_references.len()
        );

        output
    }

    fn scan_file(&self, file: &SourceFile) -> Result<FileScan, ScanError> {
        let Some(format) = file.kind.format() else {
            return Ok(FileScan::default());
        };

        let contents = file.read_contents()?;
        let rules = self.rules.rules_for(format);

        let extraction = match format {
            FormatKind::SwiftSource => SwiftParser::new(rules).parse(&file.path, &contents)?,
            FormatKind::StoryboardXib => InterfaceBuilderParser::new(rules).parse(&file.path, &contents)?,
            FormatKind::PropertyList => PlistParser::new(rules).parse(&file.path, &contents)?,
        };

        let declarations = match (file.kind, self.declarations) {
            (FileKind::SwiftSource, Some(extractor)) => extractor.extract(&file.path, &contents),
            _ => Vec::new(),
        };

        Ok(FileScan {
            extraction,
            declarations,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
