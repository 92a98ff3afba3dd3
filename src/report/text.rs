use crate::analysis::ScanOutcome;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const UNUSED_ASSETS_FILE: &str = "unused_assets.txt";
pub const UNUSED_DECLARATIONS_FILE: &str = "unused_declarations.txt";
pub const UNUSED_FILES_FILE: &str = "unused_swift_files.txt";

/// Plain text reports, one path per line, for scripts that delete files
pub struct TextReporter {
    output_dir: PathBuf,
}

impl TextReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn report(&self, outcome: &ScanOutcome) -> Result<()> {
        for path in self.write(outcome)? {
            println!("Report written to: {}", path.display());
        }
        Ok(())
    }

    /// Write the three report files and return their paths
    pub fn write(&self, outcome: &ScanOutcome) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create report directory {}", self.output_dir.display()))?;

        let result = &outcome.result;
        let assets = lines(result.unused_assets.iter().map(|item| item.path()));
        let declarations = lines(result.unused_declarations.iter().map(|item| item.path()));
        let files = lines(result.unused_files.iter().map(PathBuf::as_path));

        let mut written = Vec::new();
        for (name, contents) in [
            (UNUSED_ASSETS_FILE, assets),
            (UNUSED_DECLARATIONS_FILE, declarations),
            (UNUSED_FILES_FILE, files),
        ] {
            let path = self.output_dir.join(name);
            std::fs::write(&path, contents)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }

        Ok(written)
    }
}

/// One path per line, consecutive repeats collapsed
fn lines<'a>(paths: impl Iterator<Item = &'a Path>) -> String {
    let mut out = String::new();
    let mut previous: Option<&Path> = None;
    for path in paths {
        if previous == Some(path) {
            continue;
        }
        let _ = writeln!(out, "{}", path.display());
        previous = Some(path);
    }
    out
}
