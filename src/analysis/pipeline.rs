use super::{ExclusionFilter, Resolver, ScanResult};
use crate::catalog::CatalogExtractor;
use crate::config::Config;
use crate::discovery::{FileStats, SourceFile};
use crate::error::ScanError;
use crate::parser::{DeclarationExtractor, RuleTable};
use crate::scanner::UsageScanner;
use tracing::info;

/// Counters for the summary line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files: FileStats,
    pub declared_assets: usize,
    pub declared_symbols: usize,
    pub asset_names_referenced: usize,
    pub symbols_referenced: usize,
}

/// Everything one batch run produces
#[derive(Debug)]
pub struct ScanOutcome {
    pub result: ScanResult,
    /// Recoverable problems: unreadable files, malformed catalog entries
    pub warnings: Vec<ScanError>,
    pub stats: RunStats,
}

/// Catalog extraction, usage scanning and resolution for one file set
pub struct UnusedAnalyzer {
    rules: RuleTable,
    declarations: DeclarationExtractor,
    resolver: Resolver,
    progress: bool,
}

impl UnusedAnalyzer {
    /// Compile every rule up front. Bad patterns fail here, before any file
    /// is read.
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let rules = RuleTable::from_config(&config.rules)?;
        let declarations = DeclarationExtractor::new()?.with_functions(config.declarations.functions);

        let asset_rules = ExclusionFilter::new(
            config.assets.protected(),
            &config.assets.keep_regex,
            config.case_sensitive,
        )?;
        let declaration_rules = ExclusionFilter::new(
            &config.declarations.keep,
            &config.declarations.keep_regex,
            config.case_sensitive,
        )?;

        Ok(Self {
            rules,
            declarations,
            resolver: Resolver::new(asset_rules, declaration_rules, config.case_sensitive),
            progress: false,
        })
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn analyze(&self, files: &[SourceFile]) -> ScanOutcome {
        info!("Extracting asset catalogs...");
        let catalog = CatalogExtractor::new().extract(files);

        let scan = UsageScanner::new(&self.rules)
            .with_declarations(&self.declarations)
            .with_progress(self.progress)
            .scan(files);

        info!("Resolving references...");
        let result = self
            .resolver
            .resolve(&catalog.items, &scan.declarations, &scan.index);

        let stats = RunStats {
            files: FileStats::from_files(files),
            declared_assets: catalog.items.len(),
            declared_symbols: scan.declarations.len(),
            asset_names_referenced: scan.index.assets.len(),
            symbols_referenced: scan.index.symbols.len(),
        };

        let mut warnings = catalog.warnings;
        warnings.extend(scan.warnings);

        info!(
            "Found {} unused assets and {} unused declarations",
            result.unused_assets.len(),
            result.unused_declarations.len()
        );

        ScanOutcome {
            result,
            warnings,
            stats,
        }
    }
}
