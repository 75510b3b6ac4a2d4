use std::fmt;

use serde::{Deserialize, Serialize};

/// A DOCX document after text extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub source: String,
    pub paragraphs: Vec<String>, // Body paragraphs, table rows flattened in place
    /// Page header lines. They satisfy required-text rules but are never
    /// classified or flagged, since flag locations index `paragraphs`.
    pub headers: Vec<String>,
    pub table_count: usize,
    pub properties: DocumentProperties,
}

impl Document {
    /// Paragraph text joined with newlines, the form the classifier scans
    pub fn full_text(&self) -> String {
        self.paragraphs.join("\n")
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .map(|p| p.split_whitespace().count())
            .sum()
    }
}

/// Core properties from `docProps/core.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

/// ADGM document types recognised by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    ArticlesOfAssociation,
    MemorandumOfAssociation,
    BoardResolution,
    ShareholderResolution,
    IncorporationForm,
    UboDeclaration,
    RegisterMembersDirectors,
    EmploymentContract,
    CommercialAgreement,
    CompliancePolicy,
}

impl DocumentType {
    pub const ALL: [DocumentType; 10] = [
        DocumentType::ArticlesOfAssociation,
        DocumentType::MemorandumOfAssociation,
        DocumentType::BoardResolution,
        DocumentType::ShareholderResolution,
        DocumentType::IncorporationForm,
        DocumentType::UboDeclaration,
        DocumentType::RegisterMembersDirectors,
        DocumentType::EmploymentContract,
        DocumentType::CommercialAgreement,
        DocumentType::CompliancePolicy,
    ];

    /// Stable snake_case key used in reports and rule books
    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::ArticlesOfAssociation => "articles_of_association",
            DocumentType::MemorandumOfAssociation => "memorandum_of_association",
            DocumentType::BoardResolution => "board_resolution",
            DocumentType::ShareholderResolution => "shareholder_resolution",
            DocumentType::IncorporationForm => "incorporation_form",
            DocumentType::UboDeclaration => "ubo_declaration",
            DocumentType::RegisterMembersDirectors => "register_members_directors",
            DocumentType::EmploymentContract => "employment_contract",
            DocumentType::CommercialAgreement => "commercial_agreement",
            DocumentType::CompliancePolicy => "compliance_policy",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::ArticlesOfAssociation => "Articles of Association",
            DocumentType::MemorandumOfAssociation => "Memorandum of Association",
            DocumentType::BoardResolution => "Board Resolution",
            DocumentType::ShareholderResolution => "Shareholder Resolution",
            DocumentType::IncorporationForm => "Incorporation Application Form",
            DocumentType::UboDeclaration => "UBO Declaration Form",
            DocumentType::RegisterMembersDirectors => "Register of Members and Directors",
            DocumentType::EmploymentContract => "Employment Contract",
            DocumentType::CommercialAgreement => "Commercial Agreement",
            DocumentType::CompliancePolicy => "Compliance Policy Document",
        }
    }

    pub fn from_key(key: &str) -> Option<DocumentType> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of classifying a document. `Unclassified` is a valid result,
/// not an error, and carries zero confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    Classified {
        document_type: DocumentType,
        confidence: f64,
        matched_phrases: Vec<String>,
    },
    Unclassified,
}

impl Classification {
    pub fn document_type(&self) -> Option<DocumentType> {
        match self {
            Classification::Classified { document_type, .. } => Some(*document_type),
            Classification::Unclassified => None,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Classification::Classified { confidence, .. } => *confidence,
            Classification::Unclassified => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Severities from most to least severe
    pub const DESCENDING: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    /// Higher rank means more severe
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 2,
            Severity::Medium => 1,
            Severity::Low => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagLocation {
    pub paragraph: usize, // Zero-based index into Document::paragraphs
    pub snippet: String,
}

/// A detected compliance issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    pub rule_id: String, // e.g., "jurisdiction_issues"
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    pub document: String,
    pub location: Option<FlagLocation>, // None when the finding is an absence
}

/// Why a document could not be analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnreadableDocument,
    EmptyDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Per-document entry of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentReport {
    Analyzed {
        source: String,
        classification: Classification,
        word_count: usize,
        paragraph_count: usize,
        table_count: usize,
        red_flags: Vec<RedFlag>,
    },
    Failed {
        source: String,
        error: DocumentFailure,
    },
}

impl DocumentReport {
    pub fn source(&self) -> &str {
        match self {
            DocumentReport::Analyzed { source, .. } | DocumentReport::Failed { source, .. } => {
                source
            }
        }
    }

    pub fn red_flags(&self) -> &[RedFlag] {
        match self {
            DocumentReport::Analyzed { red_flags, .. } => red_flags,
            DocumentReport::Failed { .. } => &[],
        }
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        match self {
            DocumentReport::Analyzed { classification, .. } => classification.document_type(),
            DocumentReport::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Compliant,
    RequiresAttention,
    NonCompliant,
}

impl OverallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Compliant => "compliant",
            OverallStatus::RequiresAttention => "requires_attention",
            OverallStatus::NonCompliant => "non_compliant",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn tally<'a>(flags: impl IntoIterator<Item = &'a RedFlag>) -> Self {
        let mut counts = SeverityCounts::default();
        for flag in flags {
            match flag.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Aggregated outcome of checking a batch of documents against a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub process_key: String,
    pub process_name: String,
    pub overall_status: OverallStatus,
    pub completion_percentage: f64, // Unrounded; reports round to one decimal
    pub required_documents: Vec<DocumentType>,
    pub present_documents: Vec<DocumentType>,
    pub missing_documents: Vec<DocumentType>,
    pub red_flags: Vec<RedFlag>, // Per-document order, then input order
    pub severity_counts: SeverityCounts,
    pub documents: Vec<DocumentReport>,
    pub recommendations: Vec<String>,
}

impl ProcessResult {
    pub fn high_severity_issues(&self) -> usize {
        self.severity_counts.high
    }

    pub fn failed_documents(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents
            .iter()
            .filter(|d| matches!(d, DocumentReport::Failed { .. }))
    }
}
