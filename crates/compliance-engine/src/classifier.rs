//! Document type classification by signature phrases
//!
//! Each document type has a list of signature phrases. The type with the
//! most phrases present in the document wins; ties go to the type declared
//! first. Confidence is the share of the winner's phrases that matched.

use serde::{Deserialize, Serialize};
use shared_types::{Classification, Document, DocumentType};
use tracing::debug;

use crate::error::EngineError;
use crate::patterns::{
    ARTICLES_KEYWORDS, BOARD_RESOLUTION_KEYWORDS, COMMERCIAL_KEYWORDS, COMPLIANCE_POLICY_KEYWORDS,
    EMPLOYMENT_KEYWORDS, INCORPORATION_FORM_KEYWORDS, MEMORANDUM_KEYWORDS, REGISTER_KEYWORDS,
    SHAREHOLDER_RESOLUTION_KEYWORDS, UBO_KEYWORDS,
};

/// Signature phrases for one document type, as written in a rule book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSpec {
    pub document_type: DocumentType,
    pub phrases: Vec<String>,
}

impl SignatureSpec {
    fn new(document_type: DocumentType, phrases: &[&str]) -> Self {
        Self {
            document_type,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Built-in signature table in declaration (tie-break) order
pub fn builtin_signatures() -> Vec<SignatureSpec> {
    vec![
        SignatureSpec::new(DocumentType::ArticlesOfAssociation, ARTICLES_KEYWORDS),
        SignatureSpec::new(DocumentType::MemorandumOfAssociation, MEMORANDUM_KEYWORDS),
        SignatureSpec::new(DocumentType::BoardResolution, BOARD_RESOLUTION_KEYWORDS),
        SignatureSpec::new(
            DocumentType::ShareholderResolution,
            SHAREHOLDER_RESOLUTION_KEYWORDS,
        ),
        SignatureSpec::new(DocumentType::IncorporationForm, INCORPORATION_FORM_KEYWORDS),
        SignatureSpec::new(DocumentType::UboDeclaration, UBO_KEYWORDS),
        SignatureSpec::new(DocumentType::RegisterMembersDirectors, REGISTER_KEYWORDS),
        SignatureSpec::new(DocumentType::EmploymentContract, EMPLOYMENT_KEYWORDS),
        SignatureSpec::new(DocumentType::CommercialAgreement, COMMERCIAL_KEYWORDS),
        SignatureSpec::new(DocumentType::CompliancePolicy, COMPLIANCE_POLICY_KEYWORDS),
    ]
}

#[derive(Debug, Clone)]
struct Signature {
    document_type: DocumentType,
    phrases: Vec<String>, // Lowercased
}

#[derive(Debug, Clone)]
pub struct Classifier {
    signatures: Vec<Signature>,
    min_hits: usize,
}

impl Classifier {
    pub fn new(specs: &[SignatureSpec], min_hits: usize) -> Result<Self, EngineError> {
        let mut signatures: Vec<Signature> = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.phrases.is_empty() {
                return Err(EngineError::RuleBookLoad(format!(
                    "signature for '{}' has no phrases",
                    spec.document_type
                )));
            }
            if signatures
                .iter()
                .any(|s| s.document_type == spec.document_type)
            {
                return Err(EngineError::RuleBookLoad(format!(
                    "duplicate signature for '{}'",
                    spec.document_type
                )));
            }
            signatures.push(Signature {
                document_type: spec.document_type,
                phrases: spec.phrases.iter().map(|p| p.to_lowercase()).collect(),
            });
        }

        Ok(Self {
            signatures,
            min_hits: min_hits.max(1),
        })
    }

    pub fn min_hits(&self) -> usize {
        self.min_hits
    }

    pub fn document_types(&self) -> Vec<DocumentType> {
        self.signatures.iter().map(|s| s.document_type).collect()
    }

    pub fn classify(&self, document: &Document) -> Classification {
        self.classify_text(&document.full_text())
    }

    pub fn classify_text(&self, text: &str) -> Classification {
        let text_lower = text.to_lowercase();

        let mut best: Option<(&Signature, Vec<&str>)> = None;
        for signature in &self.signatures {
            let matched: Vec<&str> = signature
                .phrases
                .iter()
                .filter(|phrase| text_lower.contains(phrase.as_str()))
                .map(String::as_str)
                .collect();

            // Strictly greater keeps the first-declared type on ties
            let better = match &best {
                Some((_, best_matched)) => matched.len() > best_matched.len(),
                None => true,
            };
            if better {
                best = Some((signature, matched));
            }
        }

        match best {
            Some((signature, matched)) if matched.len() >= self.min_hits => {
                let confidence =
                    (matched.len() as f64 / signature.phrases.len() as f64).clamp(0.0, 1.0);
                debug!(
                    "Classified as {} ({} of {} phrases)",
                    signature.document_type,
                    matched.len(),
                    signature.phrases.len()
                );
                Classification::Classified {
                    document_type: signature.document_type,
                    confidence,
                    matched_phrases: matched.into_iter().map(str::to_string).collect(),
                }
            }
            _ => Classification::Unclassified,
        }
    }
}
