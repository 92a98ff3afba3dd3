use crate::error::ScanError;
use crate::inventory::DeclaredItem;
use regex::{Regex, RegexBuilder};

/// One way of keeping an item out of the report
#[derive(Debug, Clone)]
pub enum ExclusionRule {
    /// Exact identifier
    Literal(String),
    /// Regex searched anywhere in the identifier
    Pattern(Regex),
}

impl ExclusionRule {
    pub fn matches(&self, identifier: &str, case_sensitive: bool) -> bool {
        match self {
            ExclusionRule::Literal(name) if case_sensitive => name == identifier,
            ExclusionRule::Literal(name) => name.to_lowercase() == identifier.to_lowercase(),
            ExclusionRule::Pattern(regex) => regex.is_match(identifier),
        }
    }
}

/// Protect-list and keep-regex filter for one item population
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
    case_sensitive: bool,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            case_sensitive: true,
        }
    }
}

impl ExclusionFilter {
    /// Build a filter; any pattern that does not compile is fatal
    pub fn new<L, P>(literals: L, patterns: P, case_sensitive: bool) -> Result<Self, ScanError>
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut rules: Vec<ExclusionRule> = literals
            .into_iter()
            .map(|l| ExclusionRule::Literal(l.as_ref().to_string()))
            .collect();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|source| ScanError::InvalidExclusionPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            rules.push(ExclusionRule::Pattern(regex));
        }

        Ok(Self {
            rules,
            case_sensitive,
        })
    }

    pub fn is_excluded(&self, item: &DeclaredItem) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.matches(&item.identifier, self.case_sensitive))
    }

    /// Split items into (candidates, excluded)
    pub fn apply(&self, items: Vec<DeclaredItem>) -> (Vec<DeclaredItem>, Vec<DeclaredItem>) {
        items.into_iter().partition(|item| !self.is_excluded(item))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
