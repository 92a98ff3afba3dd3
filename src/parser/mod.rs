mod common;
mod declarations;
pub mod rules;
mod swift;
pub mod xml;

pub use common::{FileExtraction, LineIndex, Parser};
pub use declarations::DeclarationExtractor;
pub use rules::{ExtractionRule, Matcher, RuleTable, ValueTransform};
pub use swift::SwiftParser;
pub use xml::{InterfaceBuilderParser, PlistParser};
