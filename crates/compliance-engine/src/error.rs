use thiserror::Error;

/// Run-level failures. Per-document problems are findings, never errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown process: {0}")]
    UnknownProcess(String),

    #[error("Invalid pattern '{pattern}' in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid rule book: {0}")]
    RuleBookLoad(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
