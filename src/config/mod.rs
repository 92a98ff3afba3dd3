mod loader;

pub use loader::{
    is_test_source, AssetConfig, Config, DeclarationConfig, ReportConfig, RulesConfig,
    DEFAULT_PROTECTED_ASSETS,
};
