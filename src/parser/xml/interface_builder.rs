use crate::error::ScanError;
use crate::inventory::{FormatKind, RefTarget, UsageOccurrence};
use crate::parser::common::{FileExtraction, Parser};
use crate::parser::rules::{ExtractionRule, Matcher};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Usage parser for storyboards and xibs
pub struct InterfaceBuilderParser<'a> {
    rules: &'a [ExtractionRule],
}

impl<'a> InterfaceBuilderParser<'a> {
    pub fn new(rules: &'a [ExtractionRule]) -> Self {
        Self { rules }
    }
}

fn applies(rule: &ExtractionRule, element: &str, attribute: &str) -> bool {
    match &rule.matcher {
        Matcher::XmlAttribute {
            attribute: wanted,
            elements,
        } => wanted == attribute && (elements.is_empty() || elements.iter().any(|e| e == element)),
        _ => false,
    }
}

impl Parser for InterfaceBuilderParser<'_> {
    fn parse(&self, path: &Path, contents: &str) -> Result<FileExtraction, ScanError> {
        let mut result = FileExtraction::new();
        let mut seen: HashSet<(RefTarget, String)> = HashSet::new();
        let mut reader = Reader::from_str(contents);
        reader.trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let element = String::from_utf8_lossy(e.name().as_ref()).to_string();

                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                        let Ok(raw) = attr.unescape_value() else {
                            continue;
                        };

                        for rule in self.rules.iter().filter(|r| applies(r, &element, &key)) {
                            let value = rule.transform.apply(&raw);
                            if value.is_empty() || !seen.insert((rule.target, value.to_string())) {
                                continue;
                            }
                            result.usages.push(UsageOccurrence::new(
                                value,
                                path,
                                FormatKind::StoryboardXib,
                                rule.target,
                            ));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    // Keep what was read before the error
                    debug!("Error parsing interface file {}: {:?}", path.display(), e);
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        debug!(
            "Parsed interface file {}: {} references",
            path.display(),
            result.usages.len()
        );

        Ok(result)
    }
}
