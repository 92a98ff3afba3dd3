use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File format a usage was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    SwiftSource,
    StoryboardXib,
    PropertyList,
}

impl FormatKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FormatKind::SwiftSource => "swift",
            FormatKind::StoryboardXib => "interface builder",
            FormatKind::PropertyList => "property list",
        }
    }
}

/// Which population a usage can satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RefTarget {
    /// Asset-catalog entries
    Asset,
    /// Swift declarations
    Symbol,
    /// Xcode-generated asset accessors (`Image(.oldLogo)`), matched against
    /// asset names by [`asset_symbol_key`]
    AssetSymbol,
}

/// A literal reference to an identifier found in some file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageOccurrence {
    pub identifier: String,
    pub found_in: PathBuf,
    pub format: FormatKind,
    pub target: RefTarget,
    /// Times the identifier occurs in `found_in`
    pub count: usize,
}

impl UsageOccurrence {
    pub fn new(identifier: impl Into<String>, found_in: impl Into<PathBuf>, format: FormatKind, target: RefTarget) -> Self {
        Self {
            identifier: identifier.into(),
            found_in: found_in.into(),
            format,
            target,
            count: 1,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// An asset lookup whose argument is not a plain string literal.
///
/// These are invisible to the resolver. They are kept so reports can say
/// where the scanner went blind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DynamicReference {
    pub path: PathBuf,
    pub line: usize,
    pub format: FormatKind,
    /// Name of the extraction rule that saw the call
    pub rule: String,
    /// Literal text before the first interpolation, e.g. `icon_` for `"icon_\(i)"`
    pub literal_prefix: Option<String>,
}

/// Distinct usage identifiers of one namespace, with how often they occur in
/// each file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIndex {
    entries: BTreeMap<String, BTreeMap<PathBuf, usize>>,
}

impl UsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, found_in: &Path, count: usize) {
        *self
            .entries
            .entry(identifier.into())
            .or_default()
            .entry(found_in.to_path_buf())
            .or_default() += count;
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// True if the identifier occurs in any file other than `path`
    pub fn contains_outside(&self, identifier: &str, path: &Path) -> bool {
        self.entries
            .get(identifier)
            .map(|files| files.keys().any(|f| f != path))
            .unwrap_or(false)
    }

    /// Occurrences of the identifier inside `path`
    pub fn count_in(&self, identifier: &str, path: &Path) -> usize {
        self.entries
            .get(identifier)
            .and_then(|files| files.get(path))
            .copied()
            .unwrap_or(0)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the index keyed by lowercased identifiers
    pub fn case_folded(&self) -> UsageIndex {
        let mut folded = UsageIndex::new();
        for (identifier, files) in &self.entries {
            for (path, count) in files {
                folded.insert(identifier.to_lowercase(), path, *count);
            }
        }
        folded
    }
}

/// Lookup key shared by an asset name and the accessor Xcode generates for
/// it: last path component, separators dropped, lowercased.
///
/// `Old Logo`, `old_logo` and `oldLogo` all give `oldlogo`.
pub fn asset_symbol_key(name: &str) -> String {
    let last = name.rsplit(['/', '.']).next().unwrap_or(name);
    last.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Everything the usage scanner learned in one run
#[derive(Debug, Clone, Default)]
pub struct ScanIndex {
    pub assets: UsageIndex,
    pub symbols: UsageIndex,
    pub asset_symbols: UsageIndex,
    pub dynamic_references: Vec<DynamicReference>,
}

impl ScanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, occurrence: UsageOccurrence) {
        let index = match occurrence.target {
            RefTarget::Asset => &mut self.assets,
            RefTarget::Symbol => &mut self.symbols,
            RefTarget::AssetSymbol => &mut self.asset_symbols,
        };
        index.insert(occurrence.identifier, &occurrence.found_in, occurrence.count);
    }

    pub fn index_for(&self, target: RefTarget) -> &UsageIndex {
        match target {
            RefTarget::Asset => &self.assets,
            RefTarget::Symbol => &self.symbols,
            RefTarget::AssetSymbol => &self.asset_symbols,
        }
    }

    pub fn case_folded(&self) -> ScanIndex {
        ScanIndex {
            assets: self.assets.case_folded(),
            symbols: self.symbols.case_folded(),
            asset_symbols: self.asset_symbols.case_folded(),
            dynamic_references: self.dynamic_references.clone(),
        }
    }
}
