use crate::error::ScanError;
use crate::inventory::{FormatKind, RefTarget, UsageOccurrence};
use crate::parser::common::{FileExtraction, Parser};
use crate::parser::rules::{ExtractionRule, Matcher};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

const BINARY_PLIST_MAGIC: &str = "bplist";

/// An open `<dict>` or `<array>`
#[derive(Debug)]
enum Container {
    /// The key whose value comes next
    Dict { key: Option<String> },
    /// The key the whole array belongs to
    Array { key: Option<String> },
}

/// What the current text node is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextRole {
    None,
    Key,
    String,
}

/// Usage parser for XML property lists.
///
/// Keys are matched at any depth, so `CFBundleIconName` nested under
/// `CFBundleIcons > CFBundlePrimaryIcon` counts the same as a top-level one.
/// Arrays of strings under a matched key count element by element.
pub struct PlistParser<'a> {
    rules_by_key: HashMap<&'a str, Vec<&'a ExtractionRule>>,
}

impl<'a> PlistParser<'a> {
    pub fn new(rules: &'a [ExtractionRule]) -> Self {
        let mut rules_by_key: HashMap<&str, Vec<&ExtractionRule>> = HashMap::new();
        for rule in rules {
            if let Matcher::PlistKey { key } = &rule.matcher {
                rules_by_key.entry(key.as_str()).or_default().push(rule);
            }
        }
        Self { rules_by_key }
    }
}

fn current_key(stack: &[Container]) -> Option<&str> {
    match stack.last() {
        Some(Container::Dict { key }) | Some(Container::Array { key }) => key.as_deref(),
        None => None,
    }
}

/// A value finished; the next value in the enclosing dict needs a new key
fn value_done(stack: &mut [Container]) {
    if let Some(Container::Dict { key }) = stack.last_mut() {
        *key = None;
    }
}

impl Parser for PlistParser<'_> {
    fn parse(&self, path: &Path, contents: &str) -> Result<FileExtraction, ScanError> {
        if contents.starts_with(BINARY_PLIST_MAGIC) {
            return Err(ScanError::unreadable(path, "binary property list"));
        }

        let mut result = FileExtraction::new();
        let mut seen: HashSet<(RefTarget, String)> = HashSet::new();
        let mut stack: Vec<Container> = Vec::new();
        let mut role = TextRole::None;

        let mut reader = Reader::from_str(contents);
        reader.trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"dict" => stack.push(Container::Dict { key: None }),
                    b"array" => {
                        let key = current_key(&stack).map(str::to_string);
                        stack.push(Container::Array { key });
                    }
                    b"key" => role = TextRole::Key,
                    b"string" => role = TextRole::String,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => {
                    if e.name().as_ref() != b"plist" {
                        value_done(&mut stack);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Ok(text) = e.unescape() {
                        match role {
                            TextRole::Key => {
                                if let Some(Container::Dict { key }) = stack.last_mut() {
                                    *key = Some(text.to_string());
                                }
                            }
                            TextRole::String => {
                                let rules = current_key(&stack).and_then(|k| self.rules_by_key.get(k));
                                for rule in rules.into_iter().flatten() {
                                    let value = rule.transform.apply(&text);
                                    if value.is_empty() || !seen.insert((rule.target, value.to_string())) {
                                        continue;
                                    }
                                    result.usages.push(UsageOccurrence::new(
                                        value,
                                        path,
                                        FormatKind::PropertyList,
                                        rule.target,
                                    ));
                                }
                            }
                            TextRole::None => {}
                        }
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"dict" | b"array" => {
                        stack.pop();
                        value_done(&mut stack);
                    }
                    b"key" => role = TextRole::None,
                    b"plist" => {}
                    _ => {
                        role = TextRole::None;
                        value_done(&mut stack);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    debug!("Error parsing property list {}: {:?}", path.display(), e);
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        debug!(
            "Parsed property list {}: {} references",
            path.display(),
            result.usages.len()
        );

        Ok(result)
    }
}
