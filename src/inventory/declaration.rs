use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Kind of asset set inside an `.xcassets` catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Image,
    Color,
    Data,
    AppIcon,
    Symbol,
    Icon,
    CubeTexture,
    Texture,
    LaunchImage,
}

impl AssetType {
    const SUFFIXES: &'static [(&'static str, AssetType)] = &[
        (".imageset", AssetType::Image),
        (".colorset", AssetType::Color),
        (".dataset", AssetType::Data),
        (".appiconset", AssetType::AppIcon),
        (".symbolset", AssetType::Symbol),
        (".iconset", AssetType::Icon),
        (".cubetexture", AssetType::CubeTexture),
        (".textureset", AssetType::Texture),
        (".launchimage", AssetType::LaunchImage),
    ];

    /// Split an asset set directory name into its declared name and type.
    ///
    /// Returns `None` for group folders and anything without a known suffix,
    /// and for a bare suffix with no name in front of it.
    pub fn split_dir_name(dir_name: &str) -> Option<(&str, AssetType)> {
        Self::SUFFIXES.iter().find_map(|(suffix, asset_type)| {
            dir_name
                .strip_suffix(suffix)
                .filter(|name| !name.is_empty())
                .map(|name| (name, *asset_type))
        })
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AssetType::Image => "image set",
            AssetType::Color => "color set",
            AssetType::Data => "data set",
            AssetType::AppIcon => "app icon",
            AssetType::Symbol => "symbol set",
            AssetType::Icon => "icon set",
            AssetType::CubeTexture => "cube texture",
            AssetType::Texture => "texture set",
            AssetType::LaunchImage => "launch image",
        }
    }
}

/// Kind of Swift declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Struct,
    Enum,
    Protocol,
    Actor,
    TypeAlias,
    Function,
}

impl SymbolKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(SymbolKind::Class),
            "struct" => Some(SymbolKind::Struct),
            "enum" => Some(SymbolKind::Enum),
            "protocol" => Some(SymbolKind::Protocol),
            "actor" => Some(SymbolKind::Actor),
            "typealias" => Some(SymbolKind::TypeAlias),
            "func" => Some(SymbolKind::Function),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        !matches!(self, SymbolKind::Function)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::Protocol => "protocol",
            SymbolKind::Actor => "actor",
            SymbolKind::TypeAlias => "type alias",
            SymbolKind::Function => "function",
        }
    }
}

/// What a declared item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Asset(AssetType),
    SwiftDeclaration(SymbolKind),
}

impl ItemKind {
    pub fn is_asset(&self) -> bool {
        matches!(self, ItemKind::Asset(_))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Asset(asset) => asset.display_name(),
            ItemKind::SwiftDeclaration(symbol) => symbol.display_name(),
        }
    }
}

/// An asset-catalog entry or Swift symbol whose usage is under evaluation.
///
/// Identity is `(asset or declaration, identifier, source_path)`. The detailed
/// kind, line and entry point flag ride along for reporting, so `struct Foo`
/// and `func Foo` in one file are the same item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredItem {
    pub identifier: String,
    pub kind: ItemKind,
    /// Asset set directory or declaring Swift file
    pub source_path: PathBuf,
    /// 1-based line of the declaration, 0 for assets
    pub line: usize,
    /// Declared with `@main` or an application-main attribute
    pub entry_point: bool,
    /// Declarations of this name in the file (overloads), 0 for assets
    #[serde(default)]
    pub sites: usize,
}

impl DeclaredItem {
    pub fn asset(identifier: impl Into<String>, asset_type: AssetType, source_path: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            kind: ItemKind::Asset(asset_type),
            source_path: source_path.into(),
            line: 0,
            entry_point: false,
            sites: 0,
        }
    }

    pub fn declaration(
        identifier: impl Into<String>,
        symbol: SymbolKind,
        source_path: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind: ItemKind::SwiftDeclaration(symbol),
            source_path: source_path.into(),
            line,
            entry_point: false,
            sites: 1,
        }
    }

    pub fn with_entry_point(mut self, entry_point: bool) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn is_asset(&self) -> bool {
        self.kind.is_asset()
    }

    pub fn path(&self) -> &Path {
        &self.source_path
    }

    fn identity(&self) -> (bool, &str, &Path) {
        (self.is_asset(), &self.identifier, &self.source_path)
    }
}

impl PartialEq for DeclaredItem {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for DeclaredItem {}

impl Hash for DeclaredItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// Path first, then identifier: the order reports are written in
impl Ord for DeclaredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source_path
            .cmp(&other.source_path)
            .then_with(|| self.identifier.cmp(&other.identifier))
            .then_with(|| self.is_asset().cmp(&other.is_asset()))
    }
}

impl PartialOrd for DeclaredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for DeclaredItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.kind.display_name(), self.identifier)
    }
}
