use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use xcsweep::analysis::{Confidence, ScanOutcome, UnusedAnalyzer};
use xcsweep::config::Config;
use xcsweep::discovery::{FileFinder, FileStats};
use xcsweep::report::{ReportFormat, Reporter};
use xcsweep::watch::FileWatcher;

/// xcsweep - Find unused assets and Swift declarations in Xcode projects
#[derive(Parser, Debug)]
#[command(name = "xcsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target directories to analyze, relative to the project (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Path globs to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Asset names never reported as unused
    #[arg(long, value_name = "NAME")]
    protect: Vec<String>,

    /// Regexes of asset names never reported as unused
    #[arg(long, value_name = "REGEX")]
    asset_keep_regex: Vec<String>,

    /// Declaration names never reported as unused
    #[arg(long, value_name = "NAME")]
    keep: Vec<String>,

    /// Regexes of declaration names never reported as unused
    #[arg(long, value_name = "REGEX")]
    keep_regex: Vec<String>,

    /// Match names case-insensitively
    #[arg(long)]
    case_insensitive: bool,

    /// Also scan test sources (`Tests/` directories, `*Tests.swift`)
    #[arg(long)]
    include_tests: bool,

    /// Only report unused types, not functions
    #[arg(long)]
    types_only: bool,

    /// Output format (defaults to the config file's, then terminal)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output directory (text) or file (json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum confidence level to report
    #[arg(long, value_enum, default_value = "low")]
    min_confidence: MinConfidence,

    /// Watch mode - continuously monitor for changes
    #[arg(long)]
    watch: bool,

    /// Quiet period before a watch-mode re-run, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    debounce_ms: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum MinConfidence {
    #[default]
    Low,
    Medium,
    High,
}

impl From<MinConfidence> for Confidence {
    fn from(level: MinConfidence) -> Self {
        match level {
            MinConfidence::Low => Confidence::Low,
            MinConfidence::Medium => Confidence::Medium,
            MinConfidence::High => Confidence::High,
        }
    }
}

/// Settings that stay fixed across watch-mode re-runs
#[derive(Debug, Clone)]
struct RunOptions {
    format: ReportFormat,
    output: Option<PathBuf>,
    min_confidence: Confidence,
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);
    info!("xcsweep v{}", env!("CARGO_PKG_VERSION"));

    let root = cli
        .path
        .canonicalize()
        .into_diagnostic()
        .wrap_err_with(|| format!("Project path not found: {}", cli.path.display()))?;

    let config = load_config(&cli, &root)?;
    let options = run_options(&cli, &config)?;

    if cli.watch {
        run_watch_mode(config, root, options, cli.debounce_ms)
    } else {
        run_analysis(&config, &root, &options)
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli, root: &Path) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(root)?
    };

    // CLI lists extend the config file's
    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    config.exclude.extend(cli.exclude.iter().cloned());
    config.assets.protect.extend(cli.protect.iter().cloned());
    config.assets.keep_regex.extend(cli.asset_keep_regex.iter().cloned());
    config.declarations.keep.extend(cli.keep.iter().cloned());
    config.declarations.keep_regex.extend(cli.keep_regex.iter().cloned());

    if cli.case_insensitive {
        config.case_sensitive = false;
    }
    if cli.include_tests {
        config.include_tests = true;
    }
    if cli.types_only {
        config.declarations.functions = false;
    }

    Ok(config)
}

fn run_options(cli: &Cli, config: &Config) -> Result<RunOptions> {
    let format = match cli.format {
        Some(format) => format.into(),
        None => ReportFormat::from_name(&config.report.format)
            .ok_or_else(|| miette::miette!("Unknown report format '{}'", config.report.format))?,
    };

    Ok(RunOptions {
        format,
        output: cli.output.clone().or_else(|| config.report.output.clone()),
        min_confidence: cli.min_confidence.into(),
        quiet: cli.quiet,
    })
}

fn run_analysis(config: &Config, root: &Path, options: &RunOptions) -> Result<()> {
    let start_time = Instant::now();

    // Patterns are compiled before any file is touched
    let analyzer = UnusedAnalyzer::new(config)?
        .with_progress(!options.quiet && options.format == ReportFormat::Terminal);

    info!("Discovering files...");
    let files = FileFinder::new(config).find_files(root)?;
    let stats = FileStats::from_files(&files);
    info!(
        "Found {} files ({} asset sets, {} Swift, {} storyboards/xibs, {} property lists)",
        stats.total(),
        stats.catalog_entries,
        stats.swift_files,
        stats.interface_builder_files,
        stats.property_lists
    );

    // An empty project still gets its (empty) reports
    if files.is_empty() && !options.quiet && options.format == ReportFormat::Terminal {
        println!("{}", "No Swift sources, interface files or asset catalogs found.".yellow());
    }

    let outcome = analyzer.analyze(&files);
    let outcome = ScanOutcome {
        result: outcome.result.filtered(options.min_confidence),
        ..outcome
    };

    Reporter::new(options.format, options.output.clone()).report(&outcome)?;

    if !options.quiet && options.format == ReportFormat::Terminal {
        println!(
            "{}",
            format!("Completed in {:.2}s", start_time.elapsed().as_secs_f64()).dimmed()
        );
    }

    Ok(())
}

fn run_watch_mode(config: Config, root: PathBuf, options: RunOptions, debounce_ms: u64) -> Result<()> {
    let watcher = FileWatcher::new().with_debounce_ms(debounce_ms);
    let watch_root = root.clone();

    watcher
        .watch(&watch_root, move || {
            match run_analysis(&config, &root, &options) {
                Ok(()) => {
                    println!();
                    println!("{}", "Scan complete. Waiting for changes...".green());
                }
                Err(e) => {
                    eprintln!("{}: {:?}", "Scan error".red(), e);
                }
            }
            // Keep watching either way
            true
        })
        .map_err(|e| miette::miette!("Watch error: {}", e))
}
