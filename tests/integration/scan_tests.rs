//! End-to-end scans over fixture projects
//!
//! Each test lays out a small Xcode-style project in a temp directory and
//! runs discovery, extraction, scanning and resolution on it.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xcsweep::analysis::{ScanOutcome, UnusedAnalyzer};
use xcsweep::config::Config;
use xcsweep::discovery::FileFinder;
use xcsweep::error::ScanError;

const SET_CONTENTS: &str = r#"{ "images" : [], "info" : { "author" : "xcode", "version" : 1 } }"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn asset(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("Contents.json"), SET_CONTENTS).unwrap();
        path
    }

    fn scan(&self, config: &Config) -> ScanOutcome {
        let files = FileFinder::new(config).find_files(self.root()).unwrap();
        UnusedAnalyzer::new(config).unwrap().analyze(&files)
    }
}

fn unused_assets(outcome: &ScanOutcome) -> Vec<&str> {
    outcome
        .result
        .unused_assets
        .iter()
        .map(|i| i.identifier.as_str())
        .collect()
}

fn unused_declarations(outcome: &ScanOutcome) -> Vec<&str> {
    outcome
        .result
        .unused_declarations
        .iter()
        .map(|i| i.identifier.as_str())
        .collect()
}

fn no_protect() -> Config {
    let mut config = Config::default();
    config.assets.builtin_protect = false;
    config
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_protected_and_referenced_assets_are_not_unused() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/AppIcon.appiconset");
    project.asset("App/Assets.xcassets/OldLogo.imageset");
    project.file("App/Splash.swift", "let logo = UIImage(named: \"OldLogo\")\n");

    let mut config = no_protect();
    config.assets.protect.push("AppIcon".to_string());
    let outcome = project.scan(&config);

    assert!(unused_assets(&outcome).is_empty());
    assert_eq!(outcome.result.excluded.len(), 1);
    assert_eq!(outcome.result.excluded[0].identifier, "AppIcon");
}

#[test]
fn test_unreferenced_asset_is_reported() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/UnusedIcon.imageset");
    project.file("App/Home.swift", "struct Home {}\nlet x = Home()\n");

    let outcome = project.scan(&no_protect());

    assert_eq!(unused_assets(&outcome), vec!["UnusedIcon"]);
    assert_eq!(
        outcome.result.unused_assets[0].source_path,
        project.root().join("App/Assets.xcassets/UnusedIcon.imageset")
    );
}

#[test]
fn test_class_only_referenced_by_itself_is_unused() {
    let project = Project::new();
    let old = project.file(
        "App/OldViewController.swift",
        "final class OldViewController: UIViewController {\n    static func make() -> OldViewController { OldViewController() }\n}\n",
    );
    project.file("App/Home.swift", "class Home {\n    let title = \"Old\"\n}\nlet home = Home()\n");
    project.file("App/Root.swift", "let root = Home()\n");

    let outcome = project.scan(&no_protect());

    assert!(unused_declarations(&outcome).contains(&"OldViewController"));
    assert!(outcome.result.unused_files.contains(&old));
    assert!(!unused_declarations(&outcome).contains(&"Home"));
}

#[test]
fn test_helper_called_only_in_its_own_file_is_used() {
    let project = Project::new();
    project.file(
        "App/Home.swift",
        r#"class HomeViewController: UIViewController {
    override func viewDidLoad() {
        super.viewDidLoad()
        configureLayout()
    }

    private func configureLayout() {}
    private func neverCalled() {}

    private func load() {}
    private func load(id: Int) {}
}
"#,
    );
    project.file("App/App.swift", "let home = HomeViewController()\n");

    let outcome = project.scan(&no_protect());
    let unused = unused_declarations(&outcome);

    assert!(!unused.contains(&"configureLayout"));
    assert!(!unused.contains(&"HomeViewController"));
    // two overloads, no call
    assert!(unused.contains(&"load"));
    assert!(unused.contains(&"neverCalled"));
    assert!(outcome.result.unused_files.is_empty());
}

#[test]
fn test_keep_regex_hides_matching_asset() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/DebugOverlayIcon.imageset");
    project.asset("App/Assets.xcassets/Orphan.imageset");

    let mut config = no_protect();
    config.assets.keep_regex.push("^Debug.*".to_string());
    let outcome = project.scan(&config);

    assert_eq!(unused_assets(&outcome), vec!["Orphan"]);
    assert!(outcome
        .result
        .used_assets
        .iter()
        .all(|i| i.identifier != "DebugOverlayIcon"));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_excluded_items_are_in_neither_partition() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/Kept.imageset");
    project.asset("App/Assets.xcassets/KeptAndUsed.imageset");
    project.file("App/A.swift", "Image(\"KeptAndUsed\")\nclass Internal {}\n");

    let mut config = no_protect();
    config.assets.keep_regex.push("^Kept".to_string());
    config.declarations.keep.push("Internal".to_string());
    let outcome = project.scan(&config);
    let result = &outcome.result;

    for excluded in &result.excluded {
        assert!(!result.unused_assets.contains(excluded));
        assert!(!result.used_assets.contains(excluded));
        assert!(!result.unused_declarations.contains(excluded));
        assert!(!result.used_declarations.contains(excluded));
    }
    assert_eq!(result.excluded.len(), 3);
}

#[test]
fn test_scan_is_idempotent() {
    let project = Project::new();
    for name in ["C", "A", "B", "Shared"] {
        project.asset(&format!("App/Assets.xcassets/{}.imageset", name));
    }
    project.asset("Widget/Widget.xcassets/Shared.imageset");
    project.file("App/One.swift", "class One {}\nImage(\"B\")\n");
    project.file("App/Two.swift", "struct Two {}\nlet one = One()\n");
    project.file(
        "App/Main.storyboard",
        r#"<document><imageView image="Shared"/><viewController customClass="Two"/></document>"#,
    );

    let config = no_protect();
    let first = project.scan(&config);
    let second = project.scan(&config);

    assert_eq!(first.result, second.result);
    assert_eq!(unused_assets(&first), vec!["A", "C"]);
}

#[test]
fn test_unreadable_file_does_not_change_other_results() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/Logo.imageset");
    project.asset("App/Assets.xcassets/Orphan.imageset");
    project.file("App/View.swift", "let logo = UIImage(named: \"Logo\")\nclass View {}\n");
    project.file("App/Other.swift", "let v = View()\n");

    let config = no_protect();
    let baseline = project.scan(&config);
    assert!(baseline.warnings.is_empty());

    project.file("App/Broken.swift", [0xffu8, 0xfe, 0x00, 0x41, 0x0a]);
    let with_broken = project.scan(&config);

    assert_eq!(with_broken.warnings.len(), 1);
    assert!(matches!(with_broken.warnings[0], ScanError::UnreadablePath { .. }));
    assert_eq!(with_broken.result, baseline.result);
}

#[test]
fn test_malformed_catalog_entry_is_skipped() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/Good.imageset");
    fs::create_dir_all(project.root().join("App/Assets.xcassets/Empty.imageset")).unwrap();

    let outcome = project.scan(&no_protect());

    assert_eq!(unused_assets(&outcome), vec!["Good"]);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(
        outcome.warnings[0],
        ScanError::MalformedCatalogEntry { .. }
    ));
}

// ============================================================================
// Discovery and configuration
// ============================================================================

#[test]
fn test_default_protect_list() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/AppIcon.appiconset");
    project.asset("App/Assets.xcassets/AccentColor.colorset");
    project.asset("App/Assets.xcassets/Orphan.imageset");

    let outcome = project.scan(&Config::default());

    assert_eq!(unused_assets(&outcome), vec!["Orphan"]);
    assert_eq!(outcome.result.excluded.len(), 2);
}

#[test]
fn test_namespaced_group_requires_prefixed_lookup() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/Icons/Close.imageset");
    project.asset("App/Assets.xcassets/Icons/Back.imageset");
    project.file(
        "App/Assets.xcassets/Icons/Contents.json",
        r#"{ "properties" : { "provides-namespace" : true } }"#,
    );
    project.file("App/Nav.swift", "Image(\"Icons/Close\")\nImage(\"Back\")\n");

    let outcome = project.scan(&no_protect());

    assert_eq!(unused_assets(&outcome), vec!["Icons/Back"]);
}

#[test]
fn test_vendored_and_test_sources_are_skipped() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/OnlyInTests.imageset");
    project.asset("App/Assets.xcassets/OnlyInPods.imageset");
    project.file("AppTests/SnapshotTests.swift", "Image(\"OnlyInTests\")\n");
    project.file("Pods/Lib/Lib.swift", "Image(\"OnlyInPods\")\nclass PodThing {}\n");

    let outcome = project.scan(&no_protect());
    assert_eq!(unused_assets(&outcome), vec!["OnlyInPods", "OnlyInTests"]);
    assert!(!unused_declarations(&outcome).contains(&"PodThing"));

    let mut config = no_protect();
    config.include_tests = true;
    let outcome = project.scan(&config);
    assert_eq!(unused_assets(&outcome), vec!["OnlyInPods"]);
}

#[test]
fn test_types_only_skips_functions() {
    let project = Project::new();
    project.file("App/Util.swift", "struct Util {}\nfunc helper() {}\n");

    let outcome = project.scan(&no_protect());
    assert_eq!(unused_declarations(&outcome), vec!["Util", "helper"]);

    let mut config = no_protect();
    config.declarations.functions = false;
    let outcome = project.scan(&config);
    assert_eq!(unused_declarations(&outcome), vec!["Util"]);
}

#[test]
fn test_case_insensitive_matching() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/OldLogo.imageset");
    project.file("App/View.swift", "UIImage(named: \"oldlogo\")\n");

    assert_eq!(unused_assets(&project.scan(&no_protect())), vec!["OldLogo"]);

    let mut config = no_protect();
    config.case_sensitive = false;
    assert!(unused_assets(&project.scan(&config)).is_empty());
}

#[test]
fn test_dynamic_lookups_are_reported_not_resolved() {
    let project = Project::new();
    project.asset("App/Assets.xcassets/flag_fr.imageset");
    project.asset("App/Assets.xcassets/Banner.imageset");
    project.file("App/Flags.swift", "func flag(_ code: String) -> UIImage? {\n    UIImage(named: \"flag_\\(code)\")\n}\nlet f = flag(\"fr\")\n");

    let outcome = project.scan(&no_protect());
    let result = &outcome.result;

    assert_eq!(unused_assets(&outcome), vec!["Banner", "flag_fr"]);
    assert_eq!(result.dynamic_references.len(), 1);
    assert_eq!(result.dynamic_references[0].literal_prefix.as_deref(), Some("flag_"));
    assert_eq!(result.dynamic_references[0].line, 2);

    let flag = &result.unused_assets[1];
    let banner = &result.unused_assets[0];
    assert!(result.confidence_of(flag) < result.confidence_of(banner));
}
