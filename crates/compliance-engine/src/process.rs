//! Process checklists and aggregation of per-document findings

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared_types::{
    DocumentReport, DocumentType, OverallStatus, ProcessResult, RedFlag, SeverityCounts,
};

/// Completion below this percentage makes a run non-compliant
pub const NON_COMPLIANT_BELOW_PERCENT: f64 = 50.0;

/// A process as written in a rule book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub key: String,
    pub name: String,
    pub required_documents: Vec<DocumentType>,
    #[serde(default)]
    pub checklist: Vec<String>,
}

/// A named business process with its required document types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessDefinition {
    pub key: String,
    pub name: String,
    pub required_documents: Vec<DocumentType>, // Declared order, no duplicates
    pub checklist: Vec<String>,
}

impl ProcessDefinition {
    pub fn from_spec(spec: &ProcessSpec) -> Self {
        let mut required_documents = Vec::with_capacity(spec.required_documents.len());
        for doc_type in &spec.required_documents {
            if !required_documents.contains(doc_type) {
                required_documents.push(*doc_type);
            }
        }
        Self {
            key: spec.key.clone(),
            name: spec.name.clone(),
            required_documents,
            checklist: spec.checklist.clone(),
        }
    }
}

fn checklist(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in ADGM processes
pub fn builtin_processes() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec {
            key: "company_incorporation".to_string(),
            name: "Company Incorporation".to_string(),
            required_documents: vec![
                DocumentType::ArticlesOfAssociation,
                DocumentType::BoardResolution,
                DocumentType::UboDeclaration,
                DocumentType::RegisterMembersDirectors,
            ],
            checklist: checklist(&[
                "Review flagged issues and make necessary corrections",
                "Ensure all required documents are provided",
                "Declare every individual holding 25% or more in the UBO declaration",
                "Verify ADGM compliance before submission",
            ]),
        },
        ProcessSpec {
            key: "licensing".to_string(),
            name: "Business Licensing".to_string(),
            required_documents: vec![
                DocumentType::CommercialAgreement,
                DocumentType::CompliancePolicy,
            ],
            checklist: checklist(&[
                "Review flagged issues and make necessary corrections",
                "Ensure all required documents are provided",
                "Verify ADGM compliance before submission",
            ]),
        },
        ProcessSpec {
            key: "employment".to_string(),
            name: "Employment Setup".to_string(),
            required_documents: vec![DocumentType::EmploymentContract],
            checklist: checklist(&[
                "Review flagged issues and make necessary corrections",
                "Confirm probation does not exceed six months and annual leave is at least 30 days",
                "Verify ADGM compliance before submission",
            ]),
        },
    ]
}

/// Overall status: compliant iff nothing is missing and there are no
/// high-severity flags
pub fn overall_status(
    missing_documents: usize,
    high_severity_issues: usize,
    completion_percentage: f64,
) -> OverallStatus {
    if missing_documents == 0 && high_severity_issues == 0 {
        OverallStatus::Compliant
    } else if completion_percentage < NON_COMPLIANT_BELOW_PERCENT {
        OverallStatus::NonCompliant
    } else {
        OverallStatus::RequiresAttention
    }
}

/// Aggregate per-document reports against a process definition.
///
/// Several documents of one type count once. Failed documents contribute
/// no type and no flags but stay in `documents`.
pub fn check_process(process: &ProcessDefinition, documents: Vec<DocumentReport>) -> ProcessResult {
    let present_types: HashSet<DocumentType> =
        documents.iter().filter_map(|d| d.document_type()).collect();

    let (present_documents, missing_documents): (Vec<DocumentType>, Vec<DocumentType>) = process
        .required_documents
        .iter()
        .copied()
        .partition(|t| present_types.contains(t));

    let completion_percentage = if process.required_documents.is_empty() {
        100.0
    } else {
        present_documents.len() as f64 / process.required_documents.len() as f64 * 100.0
    };

    let red_flags: Vec<RedFlag> = documents
        .iter()
        .flat_map(|d| d.red_flags().iter().cloned())
        .collect();
    let severity_counts = SeverityCounts::tally(&red_flags);

    ProcessResult {
        process_key: process.key.clone(),
        process_name: process.name.clone(),
        overall_status: overall_status(
            missing_documents.len(),
            severity_counts.high,
            completion_percentage,
        ),
        completion_percentage,
        required_documents: process.required_documents.clone(),
        present_documents,
        missing_documents,
        red_flags,
        severity_counts,
        documents,
        recommendations: process.checklist.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use shared_types::{Classification, DocumentFailure, FailureKind, Severity};

    fn incorporation() -> ProcessDefinition {
        ProcessDefinition::from_spec(&builtin_processes()[0])
    }

    fn flag(source: &str, rule: &str, severity: Severity) -> RedFlag {
        RedFlag {
            rule_id: rule.to_string(),
            severity,
            description: String::new(),
            suggestion: String::new(),
            document: source.to_string(),
            location: None,
        }
    }

    fn analyzed(source: &str, doc_type: DocumentType, red_flags: Vec<RedFlag>) -> DocumentReport {
        DocumentReport::Analyzed {
            source: source.to_string(),
            classification: Classification::Classified {
                document_type: doc_type,
                confidence: 1.0,
                matched_phrases: Vec::new(),
            },
            word_count: 10,
            paragraph_count: 1,
            table_count: 0,
            red_flags,
        }
    }

    fn failed(source: &str) -> DocumentReport {
        DocumentReport::Failed {
            source: source.to_string(),
            error: DocumentFailure {
                kind: FailureKind::EmptyDocument,
                message: "empty".to_string(),
            },
        }
    }

    #[test]
    fn test_missing_documents_follow_declared_order() {
        let result = check_process(
            &incorporation(),
            vec![
                analyzed("br.docx", DocumentType::BoardResolution, vec![]),
                analyzed("aoa.docx", DocumentType::ArticlesOfAssociation, vec![]),
            ],
        );
        assert_eq!(
            result.missing_documents,
            vec![
                DocumentType::UboDeclaration,
                DocumentType::RegisterMembersDirectors
            ]
        );
        assert_eq!(
            result.present_documents,
            vec![
                DocumentType::ArticlesOfAssociation,
                DocumentType::BoardResolution
            ]
        );
        assert_eq!(result.completion_percentage, 50.0);
        assert_eq!(result.overall_status, OverallStatus::RequiresAttention);
    }

    #[test]
    fn test_duplicate_types_count_once() {
        let result = check_process(
            &incorporation(),
            vec![
                analyzed("a1.docx", DocumentType::ArticlesOfAssociation, vec![]),
                analyzed("a2.docx", DocumentType::ArticlesOfAssociation, vec![]),
            ],
        );
        assert_eq!(result.completion_percentage, 25.0);
        assert_eq!(result.overall_status, OverallStatus::NonCompliant);
    }

    #[test]
    fn test_flags_keep_document_then_rule_order() {
        let result = check_process(
            &incorporation(),
            vec![
                analyzed(
                    "first.docx",
                    DocumentType::ArticlesOfAssociation,
                    vec![
                        flag("first.docx", "b", Severity::Medium),
                        flag("first.docx", "a", Severity::High),
                    ],
                ),
                analyzed(
                    "second.docx",
                    DocumentType::BoardResolution,
                    vec![flag("second.docx", "c", Severity::Low)],
                ),
            ],
        );
        let order: Vec<(&str, &str)> = result
            .red_flags
            .iter()
            .map(|f| (f.document.as_str(), f.rule_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("first.docx", "b"), ("first.docx", "a"), ("second.docx", "c")]
        );
        assert_eq!(
            result.severity_counts,
            SeverityCounts {
                high: 1,
                medium: 1,
                low: 1
            }
        );
    }

    #[test]
    fn test_failed_document_counts_as_missing() {
        let result = check_process(
            &incorporation(),
            vec![
                analyzed("aoa.docx", DocumentType::ArticlesOfAssociation, vec![]),
                failed("corrupt.docx"),
            ],
        );
        assert_eq!(result.missing_documents.len(), 3);
        assert_eq!(result.documents.len(), 2);
        assert_eq!(result.failed_documents().count(), 1);
        assert!(result.red_flags.is_empty());
    }

    #[test]
    fn test_all_present_without_high_flags_is_compliant() {
        let result = check_process(
            &incorporation(),
            vec![
                analyzed("1.docx", DocumentType::ArticlesOfAssociation, vec![]),
                analyzed("2.docx", DocumentType::BoardResolution, vec![]),
                analyzed(
                    "3.docx",
                    DocumentType::UboDeclaration,
                    vec![flag("3.docx", "missing_dates", Severity::Medium)],
                ),
                analyzed("4.docx", DocumentType::RegisterMembersDirectors, vec![]),
            ],
        );
        assert!(result.missing_documents.is_empty());
        assert_eq!(result.completion_percentage, 100.0);
        assert_eq!(result.overall_status, OverallStatus::Compliant);
    }

    #[test]
    fn test_process_without_requirements_is_complete() {
        let process = ProcessDefinition::from_spec(&ProcessSpec {
            key: "review".to_string(),
            name: "General Review".to_string(),
            required_documents: vec![],
            checklist: vec![],
        });
        let result = check_process(&process, vec![]);
        assert_eq!(result.completion_percentage, 100.0);
        assert_eq!(result.overall_status, OverallStatus::Compliant);
    }

    #[test]
    fn test_from_spec_removes_duplicate_requirements() {
        let process = ProcessDefinition::from_spec(&ProcessSpec {
            key: "k".to_string(),
            name: "n".to_string(),
            required_documents: vec![
                DocumentType::EmploymentContract,
                DocumentType::EmploymentContract,
            ],
            checklist: vec![],
        });
        assert_eq!(process.required_documents, vec![DocumentType::EmploymentContract]);
    }

    fn any_report() -> impl Strategy<Value = DocumentReport> {
        let doc_type = proptest::sample::select(DocumentType::ALL.to_vec());
        let severity = prop_oneof![
            Just(Severity::High),
            Just(Severity::Medium),
            Just(Severity::Low)
        ];
        prop_oneof![
            (doc_type, proptest::collection::vec(severity, 0..4)).prop_map(|(t, sevs)| {
                let flags = sevs
                    .into_iter()
                    .map(|s| flag("gen.docx", "generated", s))
                    .collect();
                analyzed("gen.docx", t, flags)
            }),
            Just(failed("gen.docx")),
        ]
    }

    proptest! {
        /// Property: completion is within [0, 100] and is 100 iff nothing is missing
        #[test]
        fn completion_bounds(reports in proptest::collection::vec(any_report(), 0..8)) {
            let result = check_process(&incorporation(), reports);
            prop_assert!((0.0..=100.0).contains(&result.completion_percentage));
            prop_assert_eq!(
                result.completion_percentage == 100.0,
                result.missing_documents.is_empty()
            );
        }

        /// Property: compliant iff nothing missing and no high-severity flags
        #[test]
        fn compliant_iff_complete_and_no_high(reports in proptest::collection::vec(any_report(), 0..8)) {
            let result = check_process(&incorporation(), reports);
            let expected = result.missing_documents.is_empty() && result.high_severity_issues() == 0;
            prop_assert_eq!(result.overall_status == OverallStatus::Compliant, expected);
        }

        /// Property: severity counts add up to the flag count
        #[test]
        fn severity_counts_total(reports in proptest::collection::vec(any_report(), 0..8)) {
            let result = check_process(&incorporation(), reports);
            prop_assert_eq!(result.severity_counts.total(), result.red_flags.len());
        }
    }
}
