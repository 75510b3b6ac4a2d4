//! Red-flag rules
//!
//! A rule is a set of case-insensitive patterns with a polarity:
//! `ForbidPresent` rules flag each pattern found in the document,
//! `RequirePresent` rules flag once when none of their patterns appear in
//! the body or the page headers. Patterns are matched per paragraph. A pattern may carry `unless`
//! exceptions; an occurrence is discounted when an exception matches later
//! in the same paragraph.
//!
//! Built-in rules live in the topic modules below and are assembled into
//! the default [`crate::rulebook::RuleBook`].

pub mod execution;
pub mod jurisdiction;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use shared_types::{Document, DocumentType, FlagLocation, RedFlag, Severity};

use crate::error::EngineError;
use crate::patterns::extract_snippet;

/// Rule id of the flag raised for documents the classifier could not type
pub const UNCLASSIFIED_RULE_ID: &str = "unclassified_document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Flag when no pattern is found anywhere in the document
    RequirePresent,
    /// Flag each pattern that is found
    ForbidPresent,
}

/// A pattern as written in a rule book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
}

impl PatternSpec {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            unless: Vec::new(),
        }
    }

    pub fn unless(pattern: &str, exceptions: &[&str]) -> Self {
        Self {
            pattern: pattern.to_string(),
            unless: exceptions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// A rule as written in a rule book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub id: String,
    pub polarity: Polarity,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub suggestion: String,
    pub patterns: Vec<PatternSpec>,
    /// Document types the rule applies to; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applies_to: Vec<DocumentType>,
}

#[derive(Debug, Clone)]
pub struct RulePattern {
    pub source: String,
    regex: Regex,
    unless: Vec<Regex>,
}

impl RulePattern {
    fn compile(rule: &str, spec: &PatternSpec) -> Result<Self, EngineError> {
        Ok(Self {
            source: spec.pattern.clone(),
            regex: build_regex(rule, &spec.pattern)?,
            unless: spec
                .unless
                .iter()
                .map(|p| build_regex(rule, p))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Byte span of the first occurrence not cancelled by an exception
    pub fn find(&self, paragraph: &str) -> Option<(usize, usize)> {
        self.regex
            .find_iter(paragraph)
            .find(|m| {
                let rest = &paragraph[m.end()..];
                !self.unless.iter().any(|u| u.is_match(rest))
            })
            .map(|m| (m.start(), m.end()))
    }
}

fn build_regex(rule: &str, pattern: &str) -> Result<Regex, EngineError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| EngineError::InvalidPattern {
            rule: rule.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub polarity: Polarity,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    pub patterns: Vec<RulePattern>,
    pub applies_to: Vec<DocumentType>,
}

impl Rule {
    pub fn compile(spec: &RuleSpec) -> Result<Self, EngineError> {
        if spec.patterns.is_empty() {
            return Err(EngineError::RuleBookLoad(format!(
                "rule '{}' has no patterns",
                spec.id
            )));
        }
        Ok(Self {
            id: spec.id.clone(),
            polarity: spec.polarity,
            severity: spec.severity,
            description: spec.description.clone(),
            suggestion: spec.suggestion.clone(),
            patterns: spec
                .patterns
                .iter()
                .map(|p| RulePattern::compile(&spec.id, p))
                .collect::<Result<_, _>>()?,
            applies_to: spec.applies_to.clone(),
        })
    }

    pub fn applies_to(&self, doc_type: DocumentType) -> bool {
        self.applies_to.is_empty() || self.applies_to.contains(&doc_type)
    }

    /// Evaluate this rule alone against a document
    pub fn evaluate(&self, document: &Document) -> Vec<RedFlag> {
        match self.polarity {
            Polarity::ForbidPresent => self
                .patterns
                .iter()
                .filter_map(|pattern| find_in_document(pattern, document))
                .map(|location| self.flag(document, Some(location)))
                .collect(),
            Polarity::RequirePresent => {
                let found = self
                    .patterns
                    .iter()
                    .any(|pattern| {
                        find_in_document(pattern, document).is_some()
                            || document.headers.iter().any(|h| pattern.find(h).is_some())
                    });
                if found {
                    Vec::new()
                } else {
                    vec![self.flag(document, None)]
                }
            }
        }
    }

    fn flag(&self, document: &Document, location: Option<FlagLocation>) -> RedFlag {
        RedFlag {
            rule_id: self.id.clone(),
            severity: self.severity,
            description: self.description.clone(),
            suggestion: self.suggestion.clone(),
            document: document.source.clone(),
            location,
        }
    }
}

fn find_in_document(pattern: &RulePattern, document: &Document) -> Option<FlagLocation> {
    document
        .paragraphs
        .iter()
        .enumerate()
        .find_map(|(index, paragraph)| {
            pattern.find(paragraph).map(|(start, end)| FlagLocation {
                paragraph: index,
                snippet: extract_snippet(paragraph, start, end),
            })
        })
}

/// Evaluate every rule applicable to `doc_type`, in rule order
pub fn evaluate_rules(rules: &[Rule], document: &Document, doc_type: DocumentType) -> Vec<RedFlag> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(doc_type))
        .flat_map(|rule| rule.evaluate(document))
        .collect()
}

/// The single informational flag raised for an unclassified document
pub fn unclassified_flag(document: &Document) -> RedFlag {
    RedFlag {
        rule_id: UNCLASSIFIED_RULE_ID.to_string(),
        severity: Severity::Low,
        description: "Document type could not be identified; no compliance rules were applied"
            .to_string(),
        suggestion: "Check that the document is one of the supported ADGM document types"
            .to_string(),
        document: document.source.clone(),
        location: None,
    }
}

/// Built-in rule specs in declaration order
pub fn builtin_rules() -> Vec<RuleSpec> {
    let mut rules = Vec::new();
    rules.extend(jurisdiction::forbidden_rules());
    rules.extend(execution::rules());
    rules.extend(jurisdiction::required_rules());
    rules
}
