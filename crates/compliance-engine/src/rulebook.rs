//! Rule book: classifier signatures, red-flag rules and process definitions
//!
//! The rule book is read-only configuration. It is compiled once (the
//! built-in default, or a JSON file supplied at startup) and shared behind
//! an `Arc` by every analysis run.

use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use shared_types::DocumentType;

use crate::classifier::{Classifier, SignatureSpec};
use crate::error::EngineError;
use crate::process::{ProcessDefinition, ProcessSpec};
use crate::rules::{builtin_rules, Rule, RuleSpec};

lazy_static! {
    /// Built-in ADGM rule book
    static ref DEFAULT_RULE_BOOK: Arc<RuleBook> = Arc::new(
        RuleBook::compile(&RuleBookConfig::builtin()).expect("built-in rule book compiles")
    );
}

/// Minimum signature hits before a document is considered classified
pub const DEFAULT_MIN_SIGNATURE_HITS: usize = 1;

fn default_min_hits() -> usize {
    DEFAULT_MIN_SIGNATURE_HITS
}

/// Serializable rule book, the form used in JSON configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBookConfig {
    pub signatures: Vec<SignatureSpec>,
    pub rules: Vec<RuleSpec>,
    pub processes: Vec<ProcessSpec>,
    #[serde(default = "default_min_hits")]
    pub min_signature_hits: usize,
}

impl RuleBookConfig {
    /// The built-in ADGM configuration
    pub fn builtin() -> Self {
        Self {
            signatures: crate::classifier::builtin_signatures(),
            rules: builtin_rules(),
            processes: crate::process::builtin_processes(),
            min_signature_hits: DEFAULT_MIN_SIGNATURE_HITS,
        }
    }
}

/// Compiled, immutable rule book
#[derive(Debug)]
pub struct RuleBook {
    classifier: Classifier,
    rules: Vec<Rule>,
    processes: Vec<ProcessDefinition>,
}

impl RuleBook {
    /// Shared handle to the built-in rule book
    pub fn builtin() -> Arc<RuleBook> {
        Arc::clone(&DEFAULT_RULE_BOOK)
    }

    pub fn compile(config: &RuleBookConfig) -> Result<Self, EngineError> {
        let classifier = Classifier::new(&config.signatures, config.min_signature_hits)?;

        let mut rules = Vec::with_capacity(config.rules.len());
        for spec in &config.rules {
            if rules.iter().any(|r: &Rule| r.id == spec.id) {
                return Err(EngineError::RuleBookLoad(format!(
                    "duplicate rule id '{}'",
                    spec.id
                )));
            }
            rules.push(Rule::compile(spec)?);
        }

        let mut processes: Vec<ProcessDefinition> = Vec::with_capacity(config.processes.len());
        for spec in &config.processes {
            if processes.iter().any(|p| p.key == spec.key) {
                return Err(EngineError::RuleBookLoad(format!(
                    "duplicate process key '{}'",
                    spec.key
                )));
            }
            processes.push(ProcessDefinition::from_spec(spec));
        }

        Ok(Self {
            classifier,
            rules,
            processes,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: RuleBookConfig = serde_json::from_str(json)?;
        Self::compile(&config)
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::RuleBookLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn processes(&self) -> &[ProcessDefinition] {
        &self.processes
    }

    /// Look up a process by key or display name, ignoring case
    pub fn process(&self, name: &str) -> Option<&ProcessDefinition> {
        let wanted = name.trim();
        self.processes.iter().find(|p| {
            p.key.eq_ignore_ascii_case(wanted) || p.name.eq_ignore_ascii_case(wanted)
        })
    }

    /// Document types known to the classifier, in signature order
    pub fn document_types(&self) -> Vec<DocumentType> {
        self.classifier.document_types()
    }
}
