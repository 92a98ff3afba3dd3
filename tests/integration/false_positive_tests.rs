//! False positive tests
//!
//! Everything here is referenced through a mechanism other than a plain
//! Swift call, and must NOT be reported as unused:
//! 1. Interface Builder (images, named colors, custom classes, actions)
//! 2. Info.plist (icons, launch screen, scene delegates)
//! 3. SwiftUI and UIKit lookup variants
//! 4. Application entry points
//! 5. Names that only differ from a Swift identifier by namespace

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xcsweep::analysis::{ScanResult, UnusedAnalyzer};
use xcsweep::config::Config;
use xcsweep::discovery::FileFinder;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn asset(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("Contents.json"), "{}").unwrap();
}

fn scan(root: &Path) -> ScanResult {
    let mut config = Config::default();
    config.assets.builtin_protect = false;
    let files = FileFinder::new(&config).find_files(root).unwrap();
    UnusedAnalyzer::new(&config).unwrap().analyze(&files).result
}

fn assert_asset_used(result: &ScanResult, name: &str) {
    assert!(
        result.unused_assets.iter().all(|i| i.identifier != name),
        "asset {} reported as unused",
        name
    );
    assert!(
        result.used_assets.iter().any(|i| i.identifier == name),
        "asset {} missing from used assets",
        name
    );
}

fn assert_declaration_used(result: &ScanResult, name: &str) {
    assert!(
        result.unused_declarations.iter().all(|i| i.identifier != name),
        "declaration {} reported as unused",
        name
    );
}

// ============================================================================
// Interface Builder
// ============================================================================

#[test]
fn test_storyboard_references() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for name in ["Logo.imageset", "LogoPressed.imageset", "Tab.imageset", "Brand.colorset"] {
        asset(root, &format!("App/Assets.xcassets/{}", name));
    }
    write(
        root,
        "App/Base.lproj/Main.storyboard",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<document type="com.apple.InterfaceBuilder3.CocoaTouch.Storyboard.XIB" version="3.0">
    <scenes>
        <scene sceneID="s1">
            <objects>
                <viewController id="vc" customClass="ProfileViewController" customModule="App" sceneMemberID="viewController">
                    <view key="view" id="v">
                        <subviews>
                            <imageView image="Logo" highlightedImage="LogoPressed" id="i"/>
                            <button id="b">
                                <connections>
                                    <action selector="didTapEdit:" destination="vc" eventType="touchUpInside" id="a"/>
                                </connections>
                            </button>
                        </subviews>
                        <color key="backgroundColor" name="Brand"/>
                    </view>
                    <tabBarItem key="tabBarItem" title="Profile" image="Tab" id="t"/>
                </viewController>
            </objects>
        </scene>
    </scenes>
</document>"#,
    );
    write(
        root,
        "App/ProfileViewController.swift",
        "final class ProfileViewController: UIViewController {\n    @IBAction func didTapEdit(_ sender: UIButton) {}\n}\n",
    );

    let result = scan(root);

    for name in ["Logo", "LogoPressed", "Tab", "Brand"] {
        assert_asset_used(&result, name);
    }
    assert_declaration_used(&result, "ProfileViewController");
    assert_declaration_used(&result, "didTapEdit");
    assert!(result.unused_files.is_empty());
}

#[test]
fn test_xib_custom_class() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "App/Cells/FeedCell.xib",
        r#"<document type="com.apple.InterfaceBuilder3.CocoaTouch.XIB" version="3.0">
    <objects>
        <tableViewCell contentMode="scaleToFill" id="c" customClass="FeedCell" customModule="App"/>
    </objects>
</document>"#,
    );
    write(root, "App/Cells/FeedCell.swift", "final class FeedCell: UITableViewCell {}\n");

    let result = scan(root);
    assert_declaration_used(&result, "FeedCell");
}

// ============================================================================
// Info.plist
// ============================================================================

#[test]
fn test_info_plist_references() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    asset(root, "App/Assets.xcassets/AppIcon.appiconset");
    asset(root, "App/Assets.xcassets/LaunchBackground.imageset");
    write(
        root,
        "App/Info.plist",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIcons</key>
    <dict>
        <key>CFBundlePrimaryIcon</key>
        <dict>
            <key>CFBundleIconName</key>
            <string>AppIcon</string>
        </dict>
    </dict>
    <key>UILaunchScreen</key>
    <dict>
        <key>UIImageName</key>
        <string>LaunchBackground</string>
    </dict>
    <key>UIApplicationSceneManifest</key>
    <dict>
        <key>UISceneConfigurations</key>
        <dict>
            <key>UIWindowSceneSessionRoleApplication</key>
            <array>
                <dict>
                    <key>UISceneDelegateClassName</key>
                    <string>$(PRODUCT_MODULE_NAME).SceneDelegate</string>
                </dict>
            </array>
        </dict>
    </dict>
</dict>
</plist>"#,
    );
    write(
        root,
        "App/SceneDelegate.swift",
        "class SceneDelegate: UIResponder, UIWindowSceneDelegate {}\n",
    );

    let result = scan(root);

    assert_asset_used(&result, "AppIcon");
    assert_asset_used(&result, "LaunchBackground");
    assert_declaration_used(&result, "SceneDelegate");
}

// ============================================================================
// Swift lookup variants
// ============================================================================

#[test]
fn test_every_literal_lookup_counts() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let names = [
        "SwiftUIImage",
        "Decorative",
        "SwiftUIColor",
        "UIKitImage",
        "UIKitColor",
        "AppKitImage",
        "AppKitColor",
        "Sound",
        "Literal",
    ];
    for name in names {
        asset(root, &format!("App/Assets.xcassets/{}.imageset", name));
    }
    write(
        root,
        "App/Lookups.swift",
        r##"
Image("SwiftUIImage")
Image(decorative: "Decorative")
Color("SwiftUIColor")
UIImage(named: "UIKitImage")
UIColor(named: "UIKitColor")
NSImage(named: "AppKitImage")
NSColor(named: "AppKitColor")
NSDataAsset(name: "Sound")
#imageLiteral(resourceName: "Literal")
"##,
    );

    let result = scan(root);

    for name in names {
        assert_asset_used(&result, name);
    }
    assert!(result.dynamic_references.is_empty());
}

#[test]
fn test_lookup_spread_over_lines() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    asset(root, "App/Assets.xcassets/Wrapped.imageset");
    write(
        root,
        "App/Wrapped.swift",
        "let image = UIImage(\n    named: \"Wrapped\",\n    in: .main,\n    compatibleWith: nil\n)\n",
    );

    let result = scan(root);
    assert_asset_used(&result, "Wrapped");
}

#[test]
fn test_generated_asset_symbols_count() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    asset(root, "App/Assets.xcassets/old_logo.imageset");
    asset(root, "App/Assets.xcassets/BrandColor.colorset");
    asset(root, "App/Assets.xcassets/Orphan.imageset");
    write(
        root,
        "App/Header.swift",
        "let logo = Image(.oldLogo)\nlet tint = UIColor(resource: .brand)\n",
    );

    let result = scan(root);

    assert_asset_used(&result, "old_logo");
    assert_asset_used(&result, "BrandColor");
    assert!(result.unused_assets.iter().any(|i| i.identifier == "Orphan"));
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn test_app_entry_points() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "App/DemoApp.swift", "import SwiftUI\n\n@main\nstruct DemoApp: App {\n    var body: some Scene { WindowGroup { Text(\"Hi\") } }\n}\n");
    write(root, "Legacy/AppDelegate.swift", "@UIApplicationMain\nclass AppDelegate: UIResponder, UIApplicationDelegate {}\n");

    let result = scan(root);

    assert_declaration_used(&result, "DemoApp");
    assert_declaration_used(&result, "AppDelegate");
    assert!(result.unused_files.is_empty());
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn test_declaration_named_like_an_asset_is_not_a_reference() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    asset(root, "App/Assets.xcassets/Onboarding.imageset");
    write(root, "App/Onboarding.swift", "struct Onboarding {}\n");
    write(root, "App/Root.swift", "let flow = Onboarding()\n");

    let result = scan(root);

    // The type is used, the asset of the same name is not
    assert_declaration_used(&result, "Onboarding");
    assert!(result.unused_assets.iter().any(|i| i.identifier == "Onboarding"));
}

#[test]
fn test_system_symbols_are_not_catalog_lookups() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    asset(root, "App/Assets.xcassets/star.fill.symbolset");
    write(root, "App/Rating.swift", "Image(systemName: \"star.fill\")\n");

    let result = scan(root);

    assert!(result.unused_assets.iter().any(|i| i.identifier == "star.fill"));
    assert!(result.dynamic_references.is_empty());
}
