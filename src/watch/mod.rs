//! Watch mode
//!
//! Re-runs the whole scan whenever a Swift source, interface file, property
//! list or asset catalog under the project changes. Nothing carries over
//! between runs.

use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Component, Path};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;

/// Directories whose contents never affect the result
const IGNORED_DIRS: &[&str] = &["build", ".build", "DerivedData", "Pods", "Carthage", ".git"];

/// Watch mode errors
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    WatcherError(#[from] notify::Error),
    #[error("Failed to receive events: {0}")]
    RecvError(#[from] std::sync::mpsc::RecvError),
}

/// File watcher for continuous analysis
pub struct FileWatcher {
    /// Debounce duration in milliseconds
    debounce_ms: u64,
    /// File extensions to watch outside asset catalogs
    extensions: Vec<String>,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self {
            debounce_ms: 500,
            extensions: vec![
                "swift".to_string(),
                "storyboard".to_string(),
                "xib".to_string(),
                "plist".to_string(),
            ],
        }
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Check if a path should trigger a re-run
    fn should_trigger(&self, path: &Path) -> bool {
        let mut in_catalog = false;
        for component in path.components() {
            if let Component::Normal(name) = component {
                let name = name.to_string_lossy();
                if IGNORED_DIRS.iter().any(|d| *d == name) {
                    return false;
                }
                if name.ends_with(".xcassets") {
                    in_catalog = true;
                }
            }
        }

        // Anything inside a catalog: set directories appear and disappear
        // without a tracked extension.
        if in_catalog {
            return true;
        }

        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// Start watching a directory and call the callback on changes
    pub fn watch<F>(&self, path: &Path, mut on_change: F) -> Result<(), WatchError>
    where
        F: FnMut() -> bool, // Returns false to stop watching
    {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(self.debounce_ms), tx)?;
        debouncer.watcher().watch(path, RecursiveMode::Recursive)?;

        println!();
        println!("{}", "Watch mode active. Press Ctrl+C to stop.".cyan().bold());
        println!("{}", format!("   Watching: {}", path.display()).dimmed());
        println!();

        if !on_change() {
            return Ok(());
        }

        loop {
            match rx.recv()? {
                Ok(events) => {
                    let relevant: Vec<_> = events
                        .iter()
                        .filter(|e| {
                            matches!(e.kind, DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous)
                                && self.should_trigger(&e.path)
                        })
                        .collect();

                    if relevant.is_empty() {
                        continue;
                    }

                    println!();
                    println!(
                        "{}",
                        format!("Changes detected in {} file(s), re-scanning...", relevant.len()).yellow()
                    );
                    for event in relevant.iter().take(5) {
                        if let Some(name) = event.path.file_name() {
                            println!("   • {}", name.to_string_lossy().dimmed());
                        }
                    }
                    if relevant.len() > 5 {
                        println!("   • ... and {} more", relevant.len() - 5);
                    }
                    println!();

                    if !on_change() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("{}: {:?}", "Watch error".red(), e);
                }
            }
        }

        Ok(())
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}
