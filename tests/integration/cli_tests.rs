//! CLI integration tests
//!
//! These tests run the xcsweep binary against fixture projects.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn xcsweep() -> Command {
    Command::cargo_bin("xcsweep").expect("binary should be built")
}

/// A small project with one used and one unused asset, and one dead class
fn fixture_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    for name in ["Used.imageset", "UnusedIcon.imageset", "AppIcon.appiconset"] {
        let set = root.join("App/Assets.xcassets").join(name);
        fs::create_dir_all(&set).unwrap();
        fs::write(set.join("Contents.json"), "{}").unwrap();
    }

    write(root, "App/Home.swift", "struct Home {\n    let image = UIImage(named: \"Used\")\n}\n");
    write(root, "App/Root.swift", "let home = Home()\n");
    write(root, "App/OldViewController.swift", "class OldViewController {}\n");

    temp
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    xcsweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xcsweep"))
        .stdout(predicate::str::contains("--protect"))
        .stdout(predicate::str::contains("--keep-regex"))
        .stdout(predicate::str::contains("--case-insensitive"));
}

#[test]
fn test_cli_version() {
    xcsweep()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xcsweep"));
}

#[test]
fn test_cli_missing_path_fails() {
    xcsweep()
        .arg("/definitely/not/a/project")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project path not found"));
}

// ============================================================================
// Output formats
// ============================================================================

#[test]
fn test_cli_terminal_output() {
    let project = fixture_project();

    xcsweep()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("UnusedIcon"))
        .stdout(predicate::str::contains("OldViewController"))
        .stdout(predicate::str::contains("AppIcon").not());
}

#[test]
fn test_cli_text_reports() {
    let project = fixture_project();
    let reports = project.path().join("out");

    xcsweep()
        .arg(project.path())
        .args(["--format", "text", "--output"])
        .arg(&reports)
        .arg("--quiet")
        .assert()
        .success();

    let assets = fs::read_to_string(reports.join("unused_assets.txt")).unwrap();
    assert_eq!(assets.lines().count(), 1);
    assert!(assets.contains("UnusedIcon.imageset"));

    let declarations = fs::read_to_string(reports.join("unused_declarations.txt")).unwrap();
    assert!(declarations.contains("OldViewController.swift"));
    assert!(!declarations.contains("Home.swift"));

    let files = fs::read_to_string(reports.join("unused_swift_files.txt")).unwrap();
    assert_eq!(files.lines().count(), 1);
    assert!(files.contains("OldViewController.swift"));
}

#[test]
fn test_cli_text_reports_for_empty_project() {
    let project = TempDir::new().unwrap();
    let reports = project.path().join("out");

    xcsweep()
        .arg(project.path())
        .args(["--format", "text", "--output"])
        .arg(&reports)
        .arg("--quiet")
        .assert()
        .success();

    for name in ["unused_assets.txt", "unused_declarations.txt", "unused_swift_files.txt"] {
        let contents = fs::read_to_string(reports.join(name)).unwrap();
        assert!(contents.is_empty(), "{} should be empty", name);
    }
}

#[test]
fn test_cli_json_output() {
    let project = fixture_project();

    let output = xcsweep()
        .arg(project.path())
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["unused_assets"], 1);
    assert_eq!(json["unused_assets"][0]["name"], "UnusedIcon");
    assert_eq!(json["summary"]["excluded"], 1);
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn test_cli_protect_and_keep() {
    let project = fixture_project();

    xcsweep()
        .arg(project.path())
        .args(["--protect", "UnusedIcon", "--keep-regex", "^Old", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused assets or declarations found"));
}

#[test]
fn test_cli_invalid_keep_regex_is_fatal() {
    let project = fixture_project();

    xcsweep()
        .arg(project.path())
        .args(["--keep-regex", "Old(", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Old("));
}

#[test]
fn test_cli_config_file() {
    let project = fixture_project();
    write(
        project.path(),
        ".xcsweep.yml",
        "assets:\n  protect: [AppIcon, UnusedIcon]\ndeclarations:\n  keep: [OldViewController]\n",
    );

    xcsweep()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused assets or declarations found"));
}

#[test]
fn test_cli_config_protect_adds_to_builtin_list() {
    let project = fixture_project();
    write(project.path(), ".xcsweep.yml", "assets:\n  protect: [UnusedIcon]\n");

    let output = xcsweep()
        .arg(project.path())
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["unused_assets"], 0);
    // AppIcon from the built-in list and UnusedIcon from the file
    assert_eq!(json["summary"]["excluded"], 2);
}

#[test]
fn test_cli_min_confidence_hides_functions() {
    let project = fixture_project();
    write(project.path(), "App/Helpers.swift", "func unusedHelper() {}\n");

    xcsweep()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("unusedHelper"));

    xcsweep()
        .arg(project.path())
        .args(["--min-confidence", "medium", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unusedHelper").not())
        .stdout(predicate::str::contains("OldViewController"));
}
