//! Extraction rule table
//!
//! Every usage the scanner records comes from a rule in this table, keyed by
//! file format. New conventions (a code generator's accessor, a custom IB
//! attribute) are new rows here; the resolver never changes.

use crate::config::RulesConfig;
use crate::error::ScanError;
use crate::inventory::{FormatKind, RefTarget};
use regex::Regex;
use std::collections::BTreeMap;

/// How a rule finds candidate text
#[derive(Debug, Clone)]
pub enum Matcher {
    /// First argument of a call. `head` matches everything up to the argument;
    /// the argument is then read as a string literal, a labelled argument
    /// (ignored) or an expression (dynamic).
    CallArgument { head: Regex },

    /// Regex whose first capture group is the identifier
    Capture(Regex),

    /// Value of an XML attribute, optionally only on some element names
    XmlAttribute {
        attribute: String,
        elements: Vec<String>,
    },

    /// String value(s) of a property-list key, at any depth
    PlistKey { key: String },
}

/// Post-processing applied to a matched value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Verbatim,
    /// `didTapButton:` becomes `didTapButton`
    SelectorHead,
    /// `$(PRODUCT_MODULE_NAME).SceneDelegate` becomes `SceneDelegate`
    StripModulePrefix,
}

impl ValueTransform {
    pub fn apply<'a>(&self, value: &'a str) -> &'a str {
        let value = value.trim();
        match self {
            ValueTransform::Verbatim => value,
            ValueTransform::SelectorHead => value.split(':').next().unwrap_or(value),
            ValueTransform::StripModulePrefix => value.rsplit('.').next().unwrap_or(value),
        }
    }
}

/// One row of the table
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub name: String,
    pub target: RefTarget,
    pub matcher: Matcher,
    pub transform: ValueTransform,
}

impl ExtractionRule {
    pub fn call_argument(name: &str, head: &str) -> Result<Self, ScanError> {
        Ok(Self {
            name: name.to_string(),
            target: RefTarget::Asset,
            matcher: Matcher::CallArgument {
                head: compile(head)?,
            },
            transform: ValueTransform::Verbatim,
        })
    }

    pub fn capture(name: &str, target: RefTarget, pattern: &str) -> Result<Self, ScanError> {
        Ok(Self {
            name: name.to_string(),
            target,
            matcher: Matcher::Capture(compile(pattern)?),
            transform: ValueTransform::Verbatim,
        })
    }

    pub fn xml_attribute(target: RefTarget, attribute: &str, elements: &[&str]) -> Self {
        Self {
            name: format!("{}=\"…\"", attribute),
            target,
            matcher: Matcher::XmlAttribute {
                attribute: attribute.to_string(),
                elements: elements.iter().map(|e| e.to_string()).collect(),
            },
            transform: ValueTransform::Verbatim,
        }
    }

    pub fn plist_key(target: RefTarget, key: &str) -> Self {
        Self {
            name: key.to_string(),
            target,
            matcher: Matcher::PlistKey {
                key: key.to_string(),
            },
            transform: ValueTransform::Verbatim,
        }
    }

    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = transform;
        self
    }
}

fn compile(pattern: &str) -> Result<Regex, ScanError> {
    Regex::new(pattern).map_err(|source| ScanError::InvalidExtractionPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Rules per file format
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: BTreeMap<FormatKind, Vec<ExtractionRule>>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules xcsweep ships with
    pub fn builtin() -> Result<Self, ScanError> {
        let mut table = Self::empty();

        // Swift asset lookups
        for (name, head) in [
            ("Image", r"\bImage\s*\(\s*(?:decorative\s*:\s*)?"),
            ("Color", r"\bColor\s*\(\s*"),
            ("UIImage(named:)", r"\bUIImage\s*\(\s*named\s*:\s*"),
            ("UIColor(named:)", r"\bUIColor\s*\(\s*named\s*:\s*"),
            ("NSImage(named:)", r"\bNSImage\s*\(\s*named\s*:\s*"),
            ("NSColor(named:)", r"\bNSColor\s*\(\s*named\s*:\s*"),
            ("NSDataAsset(name:)", r"\bNSDataAsset\s*\(\s*name\s*:\s*"),
            ("#imageLiteral", r"#imageLiteral\s*\(\s*resourceName\s*:\s*"),
            ("UIImage(resource:)", r"\bUIImage\s*\(\s*resource\s*:\s*"),
            ("UIColor(resource:)", r"\bUIColor\s*\(\s*resource\s*:\s*"),
            ("NSImage(resource:)", r"\bNSImage\s*\(\s*resource\s*:\s*"),
            ("NSColor(resource:)", r"\bNSColor\s*\(\s*resource\s*:\s*"),
        ] {
            table.add(FormatKind::SwiftSource, ExtractionRule::call_argument(name, head)?);
        }

        // Any bare identifier may reference a declared symbol
        table.add(
            FormatKind::SwiftSource,
            ExtractionRule::capture("identifier", RefTarget::Symbol, r"([A-Za-z_][A-Za-z0-9_]*)")?,
        );

        // Storyboards and xibs
        for attribute in ["image", "highlightedImage", "selectedImage", "backgroundImage"] {
            table.add(
                FormatKind::StoryboardXib,
                ExtractionRule::xml_attribute(RefTarget::Asset, attribute, &[]),
            );
        }
        table.add(
            FormatKind::StoryboardXib,
            ExtractionRule::xml_attribute(RefTarget::Asset, "name", &["image", "color", "namedColor"]),
        );
        table.add(
            FormatKind::StoryboardXib,
            ExtractionRule::xml_attribute(RefTarget::Symbol, "customClass", &[]),
        );
        table.add(
            FormatKind::StoryboardXib,
            ExtractionRule::xml_attribute(RefTarget::Symbol, "selector", &["action"])
                .with_transform(ValueTransform::SelectorHead),
        );

        // Info.plist
        for key in [
            "CFBundleIconFiles",
            "CFBundleIconName",
            "UILaunchStoryboardName",
            "UILaunchImageFile",
            "UIImageName",
            "UIColorName",
        ] {
            table.add(FormatKind::PropertyList, ExtractionRule::plist_key(RefTarget::Asset, key));
        }
        for key in ["NSPrincipalClass", "NSExtensionPrincipalClass", "UISceneDelegateClassName"] {
            table.add(
                FormatKind::PropertyList,
                ExtractionRule::plist_key(RefTarget::Symbol, key)
                    .with_transform(ValueTransform::StripModulePrefix),
            );
        }

        Ok(table)
    }

    /// Built-in rules plus the user's extra rules
    pub fn from_config(config: &RulesConfig) -> Result<Self, ScanError> {
        let mut table = Self::builtin()?;

        for pattern in &config.swift_asset_patterns {
            table.add(
                FormatKind::SwiftSource,
                ExtractionRule::capture(pattern, RefTarget::Asset, pattern)?,
            );
        }

        for attribute in &config.xml_asset_attributes {
            table.add(
                FormatKind::StoryboardXib,
                ExtractionRule::xml_attribute(RefTarget::Asset, attribute, &[]),
            );
        }

        Ok(table)
    }

    pub fn add(&mut self, format: FormatKind, rule: ExtractionRule) {
        self.rules.entry(format).or_default().push(rule);
    }

    pub fn rules_for(&self, format: FormatKind) -> &[ExtractionRule] {
        self.rules.get(&format).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
