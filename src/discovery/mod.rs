mod file_finder;

pub use file_finder::{is_asset_catalog, FileFinder, FileKind, FileStats, SourceFile};
