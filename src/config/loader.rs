use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Assets that Xcode and the OS look up on their own
pub const DEFAULT_PROTECTED_ASSETS: &[&str] = &[
    "AppIcon",
    "AccentColor",
    "LaunchImage",
    "LaunchScreen",
    "AppStoreIcon",
];

/// Configuration for an xcsweep run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Narrower roots to scan, relative to the project path
    pub targets: Vec<PathBuf>,

    /// Path globs to skip during discovery
    pub exclude: Vec<String>,

    /// Scan test sources too (`/Tests/` directories, `*Tests.swift`)
    pub include_tests: bool,

    /// Identifier matching is case-sensitive, like asset lookups on device
    pub case_sensitive: bool,

    /// Exclusion rules for asset-catalog entries
    pub assets: AssetConfig,

    /// Exclusion rules and detection switches for Swift declarations
    pub declarations: DeclarationConfig,

    /// Extra extraction rules
    pub rules: RulesConfig,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset names never reported, on top of the built-in list
    pub protect: Vec<String>,

    /// Also protect [`DEFAULT_PROTECTED_ASSETS`]
    pub builtin_protect: bool,

    /// Regexes of asset names never reported
    pub keep_regex: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationConfig {
    /// Declaration names never reported
    pub keep: Vec<String>,

    /// Regexes of declaration names never reported
    pub keep_regex: Vec<String>,

    /// Report unused `func` declarations, not only types
    pub functions: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Swift regexes whose first capture group is an asset name
    pub swift_asset_patterns: Vec<String>,

    /// Storyboard/xib attributes whose value is an asset name
    pub xml_asset_attributes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, text, json
    pub format: String,

    /// Output directory (text) or file (json)
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "**/build/**".to_string(),
                "**/DerivedData/**".to_string(),
                "**/Pods/**".to_string(),
                "**/Carthage/**".to_string(),
            ],
            include_tests: false,
            case_sensitive: true,
            assets: AssetConfig::default(),
            declarations: DeclarationConfig::default(),
            rules: RulesConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            protect: vec![],
            builtin_protect: true,
            keep_regex: vec![],
        }
    }
}

impl AssetConfig {
    /// Built-in protect list (unless disabled) followed by the user's names
    pub fn protected(&self) -> Vec<String> {
        let builtin = DEFAULT_PROTECTED_ASSETS
            .iter()
            .filter(|_| self.builtin_protect)
            .map(|s| s.to_string());

        let mut names: Vec<String> = Vec::new();
        for name in builtin.chain(self.protect.iter().cloned()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            keep: vec![],
            keep_regex: vec![],
            functions: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            output: None,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".xcsweep.yml",
            ".xcsweep.yaml",
            ".xcsweep.toml",
            "xcsweep.yml",
            "xcsweep.yaml",
            "xcsweep.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Check if a path matches one of the exclusion globs
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|pattern| glob_match(pattern, &path_str))
    }

    /// Test sources are skipped unless `include_tests` is set
    pub fn should_skip_test_source(&self, path: &Path) -> bool {
        !self.include_tests && is_test_source(path)
    }
}

/// `Tests` directory component or a `*Tests.swift` file name
pub fn is_test_source(path: &Path) -> bool {
    let in_tests_dir = path
        .parent()
        .map(|p| p.components().any(|c| c.as_os_str() == "Tests"))
        .unwrap_or(false);

    let is_test_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with("Tests.swift"))
        .unwrap_or(false);

    in_tests_dir || is_test_file
}

/// Simple glob matching for patterns like "**/build/**" or "*.generated.swift"
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern.starts_with('*') && !pattern.contains('/') {
        return text.ends_with(&pattern[1..]);
    }

    if pattern.ends_with('*') && !pattern.contains('/') {
        return text.starts_with(&pattern[..pattern.len() - 1]);
    }

    if pattern.contains("**") {
        // "**/Pods/**" must match a whole directory name, not "/PodsHelper/"
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = pattern.trim_start_matches("**/").trim_end_matches("/**");
            return text.contains(&format!("/{}/", dir_name));
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }

            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }

            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }

            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    text == pattern
}
