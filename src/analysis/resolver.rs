use super::exclusion::ExclusionFilter;
use super::Confidence;
use crate::inventory::{asset_symbol_key, AssetType, DeclaredItem, DynamicReference, ItemKind, ScanIndex};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use tracing::debug;

/// Used/unused partition of the declared items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub unused_assets: Vec<DeclaredItem>,
    pub unused_declarations: Vec<DeclaredItem>,
    pub used_assets: Vec<DeclaredItem>,
    pub used_declarations: Vec<DeclaredItem>,
    /// Swift files none of whose declarations is used or excluded
    pub unused_files: Vec<PathBuf>,
    /// Items removed by protect/keep rules, in neither partition
    pub excluded: Vec<DeclaredItem>,
    /// Asset lookups that could not be resolved statically
    pub dynamic_references: Vec<DynamicReference>,
}

impl ScanResult {
    pub fn total_unused(&self) -> usize {
        self.unused_assets.len() + self.unused_declarations.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total_unused() == 0
    }

    /// How much an "unused" verdict for `item` can be trusted
    pub fn confidence_of(&self, item: &DeclaredItem) -> Confidence {
        match item.kind {
            ItemKind::SwiftDeclaration(symbol) if symbol.is_type() => Confidence::Medium,
            ItemKind::SwiftDeclaration(_) => Confidence::Low,
            ItemKind::Asset(_) => {
                let mut unbounded = false;
                for reference in &self.dynamic_references {
                    match &reference.literal_prefix {
                        Some(prefix) if item.identifier.starts_with(prefix.as_str()) => {
                            return Confidence::Low;
                        }
                        Some(_) => {}
                        None => unbounded = true,
                    }
                }
                if unbounded {
                    Confidence::Medium
                } else {
                    Confidence::High
                }
            }
        }
    }

    /// Copy with unused items below `min` left out. Classification is
    /// unchanged; the dropped items simply go unreported.
    pub fn filtered(&self, min: Confidence) -> ScanResult {
        let keep = |items: &[DeclaredItem]| -> Vec<DeclaredItem> {
            items
                .iter()
                .filter(|item| self.confidence_of(item) >= min)
                .cloned()
                .collect()
        };

        ScanResult {
            unused_assets: keep(&self.unused_assets),
            unused_declarations: keep(&self.unused_declarations),
            ..self.clone()
        }
    }
}

/// Cross-references declared items against the usage index
#[derive(Debug, Clone)]
pub struct Resolver {
    asset_rules: ExclusionFilter,
    declaration_rules: ExclusionFilter,
    case_sensitive: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ExclusionFilter::default(), ExclusionFilter::default(), true)
    }
}

impl Resolver {
    pub fn new(asset_rules: ExclusionFilter, declaration_rules: ExclusionFilter, case_sensitive: bool) -> Self {
        Self {
            asset_rules,
            declaration_rules,
            case_sensitive,
        }
    }

    fn key<'a>(&self, identifier: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(identifier)
        } else {
            Cow::Owned(identifier.to_lowercase())
        }
    }

    /// Partition `assets` and `declarations`.
    ///
    /// Pure: the same inputs always give the same, identically ordered result.
    pub fn resolve(&self, assets: &[DeclaredItem], declarations: &[DeclaredItem], index: &ScanIndex) -> ScanResult {
        let folded;
        let index = if self.case_sensitive {
            index
        } else {
            folded = index.case_folded();
            &folded
        };

        let mut result = ScanResult::default();

        let accessors: HashSet<String> = index.asset_symbols.identifiers().map(asset_symbol_key).collect();

        let (candidates, excluded) = self.asset_rules.apply(canonical(assets));
        result.excluded.extend(excluded);
        for item in candidates {
            if index.assets.contains(&self.key(&item.identifier)) || accessed(&item, &accessors) {
                result.used_assets.push(item);
            } else {
                result.unused_assets.push(item);
            }
        }

        let (candidates, excluded) = self.declaration_rules.apply(canonical(declarations));
        // A file with an excluded declaration is not dead
        let mut live_files: BTreeSet<PathBuf> = excluded.iter().map(|d| d.source_path.clone()).collect();
        result.excluded.extend(excluded);
        for item in candidates {
            if self.declaration_used(&item, index) {
                live_files.insert(item.source_path.clone());
                result.used_declarations.push(item);
            } else {
                result.unused_declarations.push(item);
            }
        }

        let dead_files: BTreeSet<PathBuf> = result
            .unused_declarations
            .iter()
            .map(|d| d.source_path.clone())
            .filter(|path| !live_files.contains(path))
            .collect();
        result.unused_files = dead_files.into_iter().collect();

        result.excluded.sort();
        result.dynamic_references = index.dynamic_references.clone();
        result.dynamic_references.sort();

        debug!(
            "Resolved: {} unused assets, {} unused declarations, {} excluded",
            result.unused_assets.len(),
            result.unused_declarations.len(),
            result.excluded.len()
        );

        result
    }
}

impl Resolver {
    /// Types need a mention outside their own file: the declaring file names
    /// them in initializers and signatures of the type itself. Functions only
    /// need one mention beyond their declaration sites.
    fn declaration_used(&self, item: &DeclaredItem, index: &ScanIndex) -> bool {
        if item.entry_point {
            return true;
        }
        let key = self.key(&item.identifier);
        if index.symbols.contains_outside(&key, &item.source_path) {
            return true;
        }
        match item.kind {
            ItemKind::SwiftDeclaration(symbol) if !symbol.is_type() => {
                index.symbols.count_in(&key, &item.source_path) > item.sites
            }
            _ => false,
        }
    }
}

/// Whether a generated accessor names this asset. Xcode drops a trailing
/// `Color` or `Image` from the accessor, so both spellings are tried.
fn accessed(item: &DeclaredItem, accessors: &HashSet<String>) -> bool {
    if accessors.is_empty() {
        return false;
    }
    let suffix = match item.kind {
        ItemKind::Asset(AssetType::Color) => Some("Color"),
        ItemKind::Asset(AssetType::Image) => Some("Image"),
        _ => None,
    };
    let trimmed = suffix
        .and_then(|suffix| item.identifier.strip_suffix(suffix))
        .filter(|name| !name.is_empty() && !name.ends_with('/'));

    std::iter::once(item.identifier.as_str())
        .chain(trimmed)
        .any(|name| accessors.contains(&asset_symbol_key(name)))
}

/// Sorted, deduplicated copy
fn canonical(items: &[DeclaredItem]) -> Vec<DeclaredItem> {
    let mut items = items.to_vec();
    items.sort();
    items.dedup();
    items
}
