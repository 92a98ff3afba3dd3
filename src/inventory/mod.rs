//! Data model shared by the extractors, the scanner and the resolver

mod declaration;
mod usage;

pub use declaration::{AssetType, DeclaredItem, ItemKind, SymbolKind};
pub use usage::{asset_symbol_key, DynamicReference, FormatKind, RefTarget, ScanIndex, UsageIndex, UsageOccurrence};
