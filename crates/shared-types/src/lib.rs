pub mod types;

pub use types::{
    Classification, Document, DocumentFailure, DocumentProperties, DocumentReport, DocumentType,
    FailureKind, FlagLocation, OverallStatus, ProcessResult, RedFlag, Severity, SeverityCounts,
};
