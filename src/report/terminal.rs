use crate::analysis::{Confidence, ScanOutcome, ScanResult};
use crate::inventory::DeclaredItem;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Show confidence levels in output
    show_confidence: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            show_confidence: true,
        }
    }

    pub fn report(&self, outcome: &ScanOutcome) -> Result<()> {
        let result = &outcome.result;

        if result.is_clean() {
            println!("{}", "No unused assets or declarations found!".green().bold());
        } else {
            println!();
            println!(
                "{}",
                format!(
                    "Found {} unused assets and {} unused declarations:",
                    result.unused_assets.len(),
                    result.unused_declarations.len()
                )
                .yellow()
                .bold()
            );
            println!();

            if self.show_confidence {
                self.print_legend();
            }

            self.print_assets(result);
            self.print_declarations(result);
            self.print_files(result);
        }

        self.print_dynamic_references(result);
        self.print_warnings(outcome);
        self.print_summary(outcome);

        Ok(())
    }

    fn print_legend(&self) {
        println!("{}", "Confidence Legend:".dimmed());
        println!(
            "  {} {} {} {} {} {}",
            "◉".bright_green(),
            "High".dimmed(),
            "○".yellow(),
            "Medium".dimmed(),
            "◌".red(),
            "Low".dimmed()
        );
        println!();
    }

    fn confidence_indicator(&self, confidence: Confidence) -> colored::ColoredString {
        match confidence {
            Confidence::High => "◉".bright_green(),
            Confidence::Medium => "○".yellow(),
            Confidence::Low => "◌".red(),
        }
    }

    fn badge(&self, result: &ScanResult, item: &DeclaredItem) -> String {
        if self.show_confidence {
            format!("{} ", self.confidence_indicator(result.confidence_of(item)))
        } else {
            String::new()
        }
    }

    fn print_assets(&self, result: &ScanResult) {
        if result.unused_assets.is_empty() {
            return;
        }

        println!("{}", "Unused assets".cyan().bold());
        for item in &result.unused_assets {
            println!(
                "  {}{} {}",
                self.badge(result, item),
                item.identifier.white(),
                format!("({})", item.kind.display_name()).dimmed()
            );
            println!("    {} {}", "→".dimmed(), item.path().display().to_string().dimmed());
        }
        println!();
    }

    fn print_declarations(&self, result: &ScanResult) {
        if result.unused_declarations.is_empty() {
            return;
        }

        let mut by_file: BTreeMap<&Path, Vec<&DeclaredItem>> = BTreeMap::new();
        for item in &result.unused_declarations {
            by_file.entry(item.path()).or_default().push(item);
        }

        println!("{}", "Unused declarations".cyan().bold());
        for (file, items) in by_file {
            println!("{}", file.display().to_string().cyan());
            for item in items {
                println!(
                    "  {}{} {} '{}'",
                    self.badge(result, item),
                    format!("{}:", item.line).dimmed(),
                    item.kind.display_name().dimmed(),
                    item.identifier.white()
                );
            }
        }
        println!();
    }

    fn print_files(&self, result: &ScanResult) {
        if result.unused_files.is_empty() {
            return;
        }

        println!("{}", "Swift files with no used declarations".cyan().bold());
        for file in &result.unused_files {
            println!("  {}", file.display());
        }
        println!();
    }

    fn print_dynamic_references(&self, result: &ScanResult) {
        if result.dynamic_references.is_empty() {
            return;
        }

        println!(
            "{}",
            format!(
                "{} asset lookups use computed names and could not be checked:",
                result.dynamic_references.len()
            )
            .yellow()
        );
        for reference in &result.dynamic_references {
            let prefix = reference
                .literal_prefix
                .as_deref()
                .map(|p| format!(" (names starting with \"{}\")", p))
                .unwrap_or_default();
            println!(
                "  {}:{} {}{}",
                reference.path.display(),
                reference.line,
                reference.rule.dimmed(),
                prefix.dimmed()
            );
        }
        println!(
            "  {}",
            "Assets loaded this way may be reported as unused. Review before deleting.".dimmed()
        );
        println!();
    }

    fn print_warnings(&self, outcome: &ScanOutcome) {
        for warning in &outcome.warnings {
            println!("{} {}", "warning:".yellow().bold(), warning);
        }
        if !outcome.warnings.is_empty() {
            println!();
        }
    }

    fn print_summary(&self, outcome: &ScanOutcome) {
        let result = &outcome.result;
        let stats = &outcome.stats;

        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        for item in result.unused_assets.iter().chain(&result.unused_declarations) {
            match result.confidence_of(item) {
                Confidence::High => high += 1,
                Confidence::Medium => medium += 1,
                Confidence::Low => low += 1,
            }
        }

        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Scanned: {} asset sets, {} Swift files, {} storyboards/xibs, {} property lists",
            stats.files.catalog_entries,
            stats.files.swift_files,
            stats.files.interface_builder_files,
            stats.files.property_lists
        );
        println!(
            "Unused: {} assets, {} declarations, {} files ({} excluded by rules)",
            result.unused_assets.len(),
            result.unused_declarations.len(),
            result.unused_files.len(),
            result.excluded.len()
        );

        if self.show_confidence && !result.is_clean() {
            let mut parts = Vec::new();
            if high > 0 {
                parts.push(format!("{} high", high).bright_green().to_string());
            }
            if medium > 0 {
                parts.push(format!("{} medium", medium).yellow().to_string());
            }
            if low > 0 {
                parts.push(format!("{} low", low).red().to_string());
            }
            println!("Confidence: {}", parts.join(", "));
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
