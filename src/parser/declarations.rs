//! Swift declaration extraction
//!
//! A line-oriented pattern, not a grammar: attributes, modifiers, a
//! declaration keyword and a name, anchored at the start of a line. It also
//! fires inside block comments and multi-line string literals.

use super::common::LineIndex;
use crate::error::ScanError;
use crate::inventory::{DeclaredItem, SymbolKind};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

const DECLARATION_PATTERN: &str = concat!(
    r"(?m)^[ \t]*",
    // attributes: @objc, @available(iOS 15, *), @main ...
    r"((?:@[A-Za-z_][A-Za-z0-9_]*(?:\([^)\n]*\))?\s+)*)",
    // modifiers
    r"((?:(?:public|internal|private|fileprivate|open|final|indirect|static|class|override|",
    r"mutating|nonmutating|nonisolated|required|convenience|dynamic|optional|distributed)",
    r"(?:\([^)\n]*\))?\s+)*)",
    r"(class|struct|enum|protocol|actor|typealias|func)\s+`?([A-Za-z_][A-Za-z0-9_]*)",
);

/// Words the pattern can land on after a `class` modifier (`class var`,
/// `class subscript`) that never name a declaration
const RESERVED_NAMES: &[&str] = &[
    "var", "let", "subscript", "init", "deinit", "func", "case", "class", "struct", "enum",
    "protocol", "extension", "operator", "associatedtype", "typealias", "actor", "macro",
];

/// Attributes that make the runtime, not our code, the caller
const ENTRY_POINT_ATTRIBUTES: &[&str] = &["@main", "@UIApplicationMain", "@NSApplicationMain"];

/// Extracts declared type and function names from Swift sources
pub struct DeclarationExtractor {
    pattern: Regex,
    functions: bool,
}

impl DeclarationExtractor {
    pub fn new() -> Result<Self, ScanError> {
        let pattern =
            Regex::new(DECLARATION_PATTERN).map_err(|source| ScanError::InvalidExtractionPattern {
                pattern: DECLARATION_PATTERN.to_string(),
                source,
            })?;
        Ok(Self {
            pattern,
            functions: true,
        })
    }

    /// Whether `func` declarations are extracted
    pub fn with_functions(mut self, functions: bool) -> Self {
        self.functions = functions;
        self
    }

    /// Declarations in one file, in source order, one per name
    pub fn extract(&self, path: &Path, contents: &str) -> Vec<DeclaredItem> {
        let lines = LineIndex::new(contents);
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut items: Vec<DeclaredItem> = Vec::new();

        for caps in self.pattern.captures_iter(contents) {
            let attributes = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let modifiers = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let (Some(keyword), Some(name)) = (caps.get(3), caps.get(4)) else {
                continue;
            };
            let Some(symbol) = SymbolKind::from_keyword(keyword.as_str()) else {
                continue;
            };

            if symbol == SymbolKind::Function {
                // Overrides implement an existing name, they do not declare one
                if !self.functions || modifiers.split_whitespace().any(|m| m == "override") {
                    continue;
                }
            }

            let name = name.as_str();
            if RESERVED_NAMES.contains(&name) {
                continue;
            }
            if let Some(&position) = seen.get(name) {
                items[position].sites += 1;
                continue;
            }
            seen.insert(name.to_string(), items.len());

            let entry_point = attributes
                .split_whitespace()
                .any(|a| ENTRY_POINT_ATTRIBUTES.contains(&a));

            trace!("{}: {} {}", path.display(), symbol.display_name(), name);
            items.push(
                DeclaredItem::declaration(name, symbol, path, lines.line_of(keyword.start()))
                    .with_entry_point(entry_point),
            );
        }

        items
    }
}
