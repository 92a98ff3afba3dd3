use super::common::{FileExtraction, LineIndex, Parser};
use super::rules::{ExtractionRule, Matcher};
use crate::error::ScanError;
use crate::inventory::{DynamicReference, FormatKind, RefTarget, UsageOccurrence};
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

/// What the first argument of an asset lookup call turned out to be
#[derive(Debug, PartialEq, Eq)]
enum Argument {
    /// `"OldLogo"`
    Literal(String),
    /// `"icon_\(index)"`, with the text before the interpolation
    Interpolated(String),
    /// `.oldLogo`, an Xcode-generated asset accessor
    Member(String),
    /// A variable or expression
    Dynamic,
    /// Labelled (`systemName:`), member (`.red`) or missing argument
    NotAnAsset,
}

/// Usage parser for Swift sources
pub struct SwiftParser<'a> {
    rules: &'a [ExtractionRule],
}

/// Per-file accumulator: one usage per identifier, counting repeats
struct Collector<'p> {
    path: &'p Path,
    positions: HashMap<(RefTarget, String), usize>,
    result: FileExtraction,
}

impl<'p> Collector<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            positions: HashMap::new(),
            result: FileExtraction::new(),
        }
    }

    fn usage(&mut self, target: RefTarget, value: &str) {
        if value.is_empty() {
            return;
        }
        if let Some(&position) = self.positions.get(&(target, value.to_string())) {
            self.result.usages[position].count += 1;
            return;
        }
        self.positions.insert((target, value.to_string()), self.result.usages.len());
        self.result.usages.push(UsageOccurrence::new(
            value,
            self.path,
            FormatKind::SwiftSource,
            target,
        ));
    }

    fn dynamic(&mut self, rule: &ExtractionRule, line: usize, literal_prefix: Option<String>) {
        self.result.dynamic_references.push(DynamicReference {
            path: self.path.to_path_buf(),
            line,
            format: FormatKind::SwiftSource,
            rule: rule.name.clone(),
            literal_prefix: literal_prefix.filter(|p| !p.is_empty()),
        });
    }
}

impl<'a> SwiftParser<'a> {
    pub fn new(rules: &'a [ExtractionRule]) -> Self {
        Self { rules }
    }
}

impl Parser for SwiftParser<'_> {
    fn parse(&self, path: &Path, contents: &str) -> Result<FileExtraction, ScanError> {
        let lines = LineIndex::new(contents);
        let mut collector = Collector::new(path);

        for rule in self.rules {
            match &rule.matcher {
                Matcher::CallArgument { head } => {
                    for m in head.find_iter(contents) {
                        let line = lines.line_of(m.start());
                        match classify_argument(&contents[m.end()..]) {
                            Argument::Literal(value) => {
                                trace!("{}:{}: {} \"{}\"", path.display(), line, rule.name, value);
                                collector.usage(rule.target, rule.transform.apply(&value));
                            }
                            Argument::Member(member) => {
                                collector.usage(RefTarget::AssetSymbol, &member);
                            }
                            Argument::Interpolated(prefix) => collector.dynamic(rule, line, Some(prefix)),
                            Argument::Dynamic => collector.dynamic(rule, line, None),
                            Argument::NotAnAsset => {}
                        }
                    }
                }
                Matcher::Capture(regex) => {
                    for caps in regex.captures_iter(contents) {
                        if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                            collector.usage(rule.target, rule.transform.apply(m.as_str()));
                        }
                    }
                }
                Matcher::XmlAttribute { .. } | Matcher::PlistKey { .. } => {}
            }
        }

        Ok(collector.result)
    }
}

/// Classify the text right after an asset lookup's opening parenthesis
fn classify_argument(rest: &str) -> Argument {
    let Some(first) = rest.chars().next() else {
        return Argument::NotAnAsset;
    };

    match first {
        '"' => read_string_literal(rest),
        '.' => read_member(&rest[1..]),
        ')' | ',' => Argument::NotAnAsset,
        c if c.is_alphabetic() || c == '_' => {
            let ident_len = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if rest[ident_len..].trim_start().starts_with(':') {
                Argument::NotAnAsset
            } else {
                Argument::Dynamic
            }
        }
        _ => Argument::Dynamic,
    }
}

/// Read `name` or `Group.name` after a leading dot. Only a bare member that
/// is the whole argument counts; `.init(...)` and `.red.opacity(0.5)` do not.
fn read_member(rest: &str) -> Argument {
    let len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(rest.len());
    let chain = rest[..len].trim_end_matches('.');
    let closes = matches!(rest[len..].trim_start().chars().next(), Some(')') | Some(','));

    match chain.rsplit('.').next() {
        Some(last) if !last.is_empty() && closes => Argument::Member(chain.to_string()),
        _ => Argument::NotAnAsset,
    }
}

/// Read a single-line string literal starting at `rest`'s opening quote
fn read_string_literal(rest: &str) -> Argument {
    // Multi-line literals are not asset names
    if rest.starts_with("\"\"\"") {
        return Argument::NotAnAsset;
    }

    let mut value = String::new();
    let mut chars = rest[1..].chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Argument::Literal(value),
            '\\' => match chars.next() {
                Some('(') => return Argument::Interpolated(value),
                Some(escaped) => {
                    value.push('\\');
                    value.push(escaped);
                }
                None => break,
            },
            '\n' => break,
            _ => value.push(c),
        }
    }

    // Unterminated
    Argument::NotAnAsset
}
