use shared_types::{DocumentFailure, FailureKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocxError {
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("Document contains no extractable text")]
    EmptyDocument,
}

impl DocxError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DocxError::UnreadableDocument(_) => FailureKind::UnreadableDocument,
            DocxError::EmptyDocument => FailureKind::EmptyDocument,
        }
    }
}

impl From<DocxError> for DocumentFailure {
    fn from(err: DocxError) -> Self {
        DocumentFailure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
