//! ADGM document compliance engine
//!
//! Loads DOCX documents, classifies each one, evaluates the red-flag rules
//! that apply to its type and checks the batch against a process checklist.

pub mod classifier;
pub mod error;
pub mod patterns;
pub mod process;
pub mod report;
pub mod rulebook;
pub mod rules;

use std::path::PathBuf;
use std::sync::Arc;

use shared_docx::DocxError;
use shared_types::{Document, DocumentFailure, DocumentReport, ProcessResult};
use tracing::{info, warn};

pub use classifier::{Classifier, SignatureSpec};
pub use error::EngineError;
pub use process::{check_process, ProcessDefinition, ProcessSpec};
pub use report::{render_json, render_text, ReportFormat, StructuredReport, TextReport};
pub use rulebook::{RuleBook, RuleBookConfig};
pub use rules::{PatternSpec, Polarity, Rule, RuleSpec};

/// A document handed to the engine
#[derive(Debug, Clone)]
pub enum DocumentInput {
    /// Uploaded bytes with their original file name
    Bytes { name: String, bytes: Vec<u8> },
    Path(PathBuf),
}

impl DocumentInput {
    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        DocumentInput::Bytes {
            name: name.into(),
            bytes,
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentInput::Path(path.into())
    }

    /// Name used to attribute findings
    pub fn source(&self) -> String {
        match self {
            DocumentInput::Bytes { name, .. } => name.clone(),
            DocumentInput::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    fn load(&self) -> Result<Document, DocxError> {
        match self {
            DocumentInput::Bytes { name, bytes } => shared_docx::load_docx(name, bytes),
            DocumentInput::Path(path) => shared_docx::load_docx_file(path),
        }
    }
}

/// ComplianceEngine entry point
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    book: Arc<RuleBook>,
}

impl ComplianceEngine {
    /// Engine backed by the built-in ADGM rule book
    pub fn new() -> Self {
        Self {
            book: RuleBook::builtin(),
        }
    }

    pub fn with_rule_book(book: Arc<RuleBook>) -> Self {
        Self { book }
    }

    pub fn rule_book(&self) -> &RuleBook {
        &self.book
    }

    /// Analyze a batch of documents for a process.
    ///
    /// Fails only when the process is unknown. A document that cannot be
    /// loaded is reported as failed and the run continues.
    pub fn analyze(
        &self,
        documents: &[DocumentInput],
        process_name: &str,
    ) -> Result<ProcessResult, EngineError> {
        let process = self
            .book
            .process(process_name)
            .ok_or_else(|| EngineError::UnknownProcess(process_name.to_string()))?;

        info!(
            "Analyzing {} document(s) for {}",
            documents.len(),
            process.name
        );

        let reports: Vec<DocumentReport> = documents
            .iter()
            .map(|input| match input.load() {
                Ok(document) => self.review(&document),
                Err(e) => {
                    warn!("Could not analyze {}: {}", input.source(), e);
                    DocumentReport::Failed {
                        source: input.source(),
                        error: DocumentFailure::from(e),
                    }
                }
            })
            .collect();

        let result = check_process(process, reports);
        info!(
            "{}: {} ({:.1}% complete, {} red flags)",
            result.process_name,
            result.overall_status.label(),
            result.completion_percentage,
            result.red_flags.len()
        );
        Ok(result)
    }

    /// Classify a loaded document and evaluate its rules
    pub fn review(&self, document: &Document) -> DocumentReport {
        let classification = self.book.classifier().classify(document);
        let red_flags = match classification.document_type() {
            Some(doc_type) => rules::evaluate_rules(self.book.rules(), document, doc_type),
            None => vec![rules::unclassified_flag(document)],
        };

        DocumentReport::Analyzed {
            source: document.source.clone(),
            classification,
            word_count: document.word_count(),
            paragraph_count: document.paragraph_count(),
            table_count: document.table_count,
            red_flags,
        }
    }

    pub fn render(
        &self,
        result: &ProcessResult,
        format: ReportFormat,
    ) -> Result<Vec<u8>, EngineError> {
        report::render(result, format)
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new()
    }
}
