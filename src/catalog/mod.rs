//! Asset catalog extraction
//!
//! Maps the asset set directories of `.xcassets` catalogs to declared items.
//! Only leaf asset sets count: `Contents.json` files, plain group folders and
//! anything nested inside another asset set (image stack layers and the like)
//! are catalog metadata.

use crate::discovery::{is_asset_catalog, FileKind, SourceFile};
use crate::error::ScanError;
use crate::inventory::{AssetType, DeclaredItem};
use rayon::prelude::*;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONTENTS_FILE: &str = "Contents.json";

/// Containers whose children are parts of one asset, not assets of their own
const CONTAINER_SUFFIXES: &[&str] = &[
    ".imagestack",
    ".imagestacklayer",
    ".brandassets",
    ".complicationset",
];

/// The subset of a group folder's Contents.json we care about
#[derive(Debug, Default, Deserialize)]
struct FolderContents {
    #[serde(default)]
    properties: FolderProperties,
}

#[derive(Debug, Default, Deserialize)]
struct FolderProperties {
    #[serde(rename = "provides-namespace", default)]
    provides_namespace: bool,
}

/// Declared assets plus whatever could not be read
#[derive(Debug, Default)]
pub struct CatalogExtraction {
    pub items: Vec<DeclaredItem>,
    pub warnings: Vec<ScanError>,
}

/// Extracts declared assets from asset catalog entries
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogExtractor;

impl CatalogExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every catalog entry; one bad entry never stops the others
    pub fn extract(&self, files: &[SourceFile]) -> CatalogExtraction {
        let results: Vec<_> = files
            .par_iter()
            .filter(|f| f.kind == FileKind::AssetCatalogEntry)
            .map(|f| self.extract_entry(&f.path))
            .collect();

        let mut extraction = CatalogExtraction::default();
        for result in results {
            match result {
                Ok(Some(item)) => extraction.items.push(item),
                Ok(None) => {}
                Err(e) => {
                    warn!("{}", e);
                    extraction.warnings.push(e);
                }
            }
        }

        extraction.items.sort();
        extraction.items.dedup();

        debug!(
            "Extracted {} assets ({} warnings)",
            extraction.items.len(),
            extraction.warnings.len()
        );
        extraction
    }

    /// Extract a single asset set directory.
    ///
    /// `Ok(None)` means the entry is catalog metadata rather than an asset.
    pub fn extract_entry(&self, path: &Path) -> Result<Option<DeclaredItem>, ScanError> {
        let dir_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return Err(ScanError::unreadable(path, "entry name is not valid UTF-8")),
        };

        let Some((name, asset_type)) = AssetType::split_dir_name(dir_name) else {
            return Ok(None);
        };

        let folders = enclosing_folders(path);
        if folders.iter().any(|folder| is_asset_or_container(folder)) {
            debug!("Ignoring nested asset entry: {}", path.display());
            return Ok(None);
        }

        if !path.is_dir() {
            return Err(ScanError::unreadable(path, "not a directory"));
        }

        let contents_path = path.join(CONTENTS_FILE);
        let contents = match std::fs::read_to_string(&contents_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScanError::malformed(path, "missing Contents.json"));
            }
            Err(e) => return Err(ScanError::unreadable(&contents_path, e)),
        };

        if let Err(e) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&contents) {
            return Err(ScanError::malformed(path, format!("Contents.json: {}", e)));
        }

        let mut identifier = String::new();
        for folder in folders.iter().rev() {
            if provides_namespace(folder) {
                if let Some(folder_name) = folder_name(folder) {
                    identifier.push_str(folder_name);
                    identifier.push('/');
                }
            }
        }
        identifier.push_str(name);

        Ok(Some(DeclaredItem::asset(identifier, asset_type, path)))
    }
}

fn folder_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn is_asset_or_container(folder: &Path) -> bool {
    folder_name(folder)
        .map(|name| {
            AssetType::split_dir_name(name).is_some()
                || CONTAINER_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Folders between the entry and its catalog root, innermost first
fn enclosing_folders(path: &Path) -> Vec<PathBuf> {
    path.ancestors()
        .skip(1)
        .take_while(|ancestor| !is_asset_catalog(ancestor))
        .filter(|ancestor| ancestor.file_name().is_some())
        .map(Path::to_path_buf)
        .collect()
}

/// A group folder that namespaces its children. Unreadable or odd
/// Contents.json files simply do not namespace.
fn provides_namespace(folder: &Path) -> bool {
    std::fs::read_to_string(folder.join(CONTENTS_FILE))
        .ok()
        .and_then(|contents| serde_json::from_str::<FolderContents>(&contents).ok())
        .map(|contents| contents.properties.provides_namespace)
        .unwrap_or(false)
}
