use crate::config::Config;
use crate::error::ScanError;
use crate::inventory::{AssetType, FormatKind};
use ignore::WalkBuilder;
use miette::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Kind of input the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    /// Asset set directory inside an `.xcassets` catalog
    AssetCatalogEntry,
    SwiftSource,
    StoryboardXib,
    PropertyList,
}

impl FileKind {
    /// Determine the kind of a regular file from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "swift" => Some(FileKind::SwiftSource),
            "storyboard" | "xib" => Some(FileKind::StoryboardXib),
            "plist" => Some(FileKind::PropertyList),
            _ => None,
        }
    }

    /// Format the usage scanner applies to this kind, if it scans it at all
    pub fn format(&self) -> Option<FormatKind> {
        match self {
            FileKind::AssetCatalogEntry => None,
            FileKind::SwiftSource => Some(FormatKind::SwiftSource),
            FileKind::StoryboardXib => Some(FormatKind::StoryboardXib),
            FileKind::PropertyList => Some(FormatKind::PropertyList),
        }
    }
}

/// A discovered input: a path tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Read the file as UTF-8 text.
    ///
    /// A single attempt; I/O and decoding failures both come back as
    /// [`ScanError::UnreadablePath`].
    pub fn read_contents(&self) -> std::result::Result<String, ScanError> {
        let bytes = std::fs::read(&self.path).map_err(|e| ScanError::unreadable(&self.path, e))?;
        String::from_utf8(bytes).map_err(|e| ScanError::unreadable(&self.path, e))
    }
}

/// Check if a directory is an asset catalog
pub fn is_asset_catalog(path: &Path) -> bool {
    path.extension().map(|e| e == "xcassets").unwrap_or(false)
}

/// File finder for discovering inputs in an Xcode project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find every input under the given path, sorted by path
    pub fn find_files(&self, root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning for files in: {}", root.display());

        let targets = if self.config.targets.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.config.targets.iter().map(|t| root.join(t)).collect()
        };

        let mut files: Vec<SourceFile> = targets
            .par_iter()
            .flat_map(|target| self.scan_directory(target))
            .collect();

        files.sort();
        files.dedup();

        debug!("Found {} files", files.len());
        Ok(files)
    }

    fn scan_directory(&self, dir: &Path) -> Vec<SourceFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        // Catalog contents are enumerated separately, so the ignore walker
        // stops at the `.xcassets` directory itself.
        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .filter_entry(|entry| !entry.path().parent().map(is_asset_catalog).unwrap_or(false))
            .build();

        let mut files = Vec::new();

        for entry in walker.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if self.config.should_exclude(path) {
                trace!("Excluding: {}", path.display());
                continue;
            }

            if file_type.is_dir() {
                if is_asset_catalog(path) {
                    files.extend(self.scan_catalog(path));
                }
                continue;
            }

            if !file_type.is_file() {
                continue;
            }

            let Some(kind) = FileKind::from_path(path) else {
                continue;
            };

            if kind == FileKind::SwiftSource && self.config.should_skip_test_source(path) {
                trace!("Skipping test source: {}", path.display());
                continue;
            }

            trace!("Found {:?}: {}", kind, path.display());
            files.push(SourceFile::new(path, kind));
        }

        files
    }

    /// Every asset set directory inside one catalog
    fn scan_catalog(&self, catalog: &Path) -> Vec<SourceFile> {
        WalkDir::new(catalog)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping catalog entry in {}: {}", catalog.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| AssetType::split_dir_name(&entry.file_name().to_string_lossy()).is_some())
            .map(|entry| SourceFile::new(entry.into_path(), FileKind::AssetCatalogEntry))
            .collect()
    }
}

/// Statistics about discovered files
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub catalog_entries: usize,
    pub swift_files: usize,
    pub interface_builder_files: usize,
    pub property_lists: usize,
}

impl FileStats {
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut stats = Self::default();
        for file in files {
            match file.kind {
                FileKind::AssetCatalogEntry => stats.catalog_entries += 1,
                FileKind::SwiftSource => stats.swift_files += 1,
                FileKind::StoryboardXib => stats.interface_builder_files += 1,
                FileKind::PropertyList => stats.property_lists += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.catalog_entries + self.swift_files + self.interface_builder_files + self.property_lists
    }
}
