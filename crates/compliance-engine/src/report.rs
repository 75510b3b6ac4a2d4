//! JSON and plain-text renderings of a [`ProcessResult`]
//!
//! Both renderings are pure functions of the result: the same input always
//! produces the same bytes. Flags are grouped by descending severity and
//! otherwise keep their aggregation order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{
    Classification, DocumentReport, DocumentType, OverallStatus, ProcessResult, RedFlag, Severity,
    SeverityCounts,
};

use crate::error::EngineError;

const TITLE: &str = "ADGM CORPORATE AGENT - DOCUMENT ANALYSIS REPORT";

const DISCLAIMER: &str = "This report is for guidance only and does not constitute legal advice.\n\
Consult qualified legal professionals for official ADGM submissions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "text" | "txt" => Ok(ReportFormat::Text),
            other => Err(format!(
                "Invalid format '{}'. Must be 'json' or 'text'",
                other
            )),
        }
    }
}

/// Structured report, the JSON rendering's schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub process_name: String,
    pub process_key: String,
    pub overall_status: OverallStatus,
    pub completion_percentage: f64, // One decimal
    pub missing_documents: Vec<DocumentType>,
    pub present_documents: Vec<DocumentType>,
    pub documents_analyzed: usize,
    pub documents_failed: usize,
    pub red_flags: usize,
    pub high_severity_issues: usize,
    pub severity_counts: SeverityCounts,
    pub flags: Vec<RedFlag>,
    pub documents: Vec<DocumentReport>,
    pub recommendations: Vec<String>,
}

impl StructuredReport {
    pub fn from_result(result: &ProcessResult) -> Self {
        let documents_failed = result.failed_documents().count();
        Self {
            process_name: result.process_name.clone(),
            process_key: result.process_key.clone(),
            overall_status: result.overall_status,
            completion_percentage: round_one_decimal(result.completion_percentage),
            missing_documents: result.missing_documents.clone(),
            present_documents: result.present_documents.clone(),
            documents_analyzed: result.documents.len() - documents_failed,
            documents_failed,
            red_flags: result.red_flags.len(),
            high_severity_issues: result.high_severity_issues(),
            severity_counts: result.severity_counts,
            flags: grouped_by_severity(&result.red_flags)
                .into_iter()
                .cloned()
                .collect(),
            documents: result.documents.clone(),
            recommendations: result.recommendations.clone(),
        }
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Flags ordered high, medium, low; ties keep their original order
pub fn grouped_by_severity(flags: &[RedFlag]) -> Vec<&RedFlag> {
    let mut grouped: Vec<&RedFlag> = flags.iter().collect();
    grouped.sort_by_key(|f| std::cmp::Reverse(f.severity.rank()));
    grouped
}

pub fn render(result: &ProcessResult, format: ReportFormat) -> Result<Vec<u8>, EngineError> {
    match format {
        ReportFormat::Json => render_json(result),
        ReportFormat::Text => Ok(render_text(result).into_bytes()),
    }
}

pub fn render_json(result: &ProcessResult) -> Result<Vec<u8>, EngineError> {
    Ok(serde_json::to_vec_pretty(&StructuredReport::from_result(
        result,
    ))?)
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(title.chars().count()))
}

fn status_label(status: OverallStatus) -> String {
    status.label().replace('_', " ").to_uppercase()
}

fn describe_flag(flag: &RedFlag) -> String {
    let mut line = format!(
        "[{}] {}: {} ({})",
        flag.severity.label().to_uppercase(),
        flag.document,
        flag.description,
        flag.rule_id
    );
    if let Some(location) = &flag.location {
        line.push_str(&format!(
            " at paragraph {}: \"{}\"",
            location.paragraph + 1,
            location.snippet
        ));
    }
    line
}

fn describe_document(report: &DocumentReport) -> String {
    match report {
        DocumentReport::Analyzed {
            source,
            classification,
            red_flags,
            ..
        } => {
            let kind = match classification {
                Classification::Classified {
                    document_type,
                    confidence,
                    ..
                } => format!(
                    "{} (confidence {:.0}%)",
                    document_type.display_name(),
                    confidence * 100.0
                ),
                Classification::Unclassified => "unclassified".to_string(),
            };
            let findings = match red_flags.len() {
                0 => "analyzed, no red flags found".to_string(),
                1 => "1 red flag".to_string(),
                n => format!("{} red flags", n),
            };
            format!("{}: {}, {}", source, kind, findings)
        }
        DocumentReport::Failed { source, error } => {
            format!("{}: COULD NOT ANALYZE - {}", source, error.message)
        }
    }
}

/// Narrative report: summary, missing documents, flags by severity,
/// per-document status, recommendations
pub fn render_text(result: &ProcessResult) -> String {
    TextReport(result).to_string()
}

/// Plain-text rendering of a [`ProcessResult`]
pub struct TextReport<'a>(pub &'a ProcessResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let failed = result.failed_documents().count();

        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}", "=".repeat(TITLE.len()))?;
        writeln!(f)?;

        heading(f, "EXECUTIVE SUMMARY")?;
        writeln!(f, "Process: {}", result.process_name)?;
        writeln!(f, "Status: {}", status_label(result.overall_status))?;
        writeln!(
            f,
            "Documents: {} analyzed, {} could not be analyzed",
            result.documents.len() - failed,
            failed
        )?;
        writeln!(
            f,
            "Completion: {:.1}%",
            round_one_decimal(result.completion_percentage)
        )?;
        writeln!(f, "Red Flags: {}", result.red_flags.len())?;
        writeln!(f, "High Severity: {}", result.high_severity_issues())?;
        writeln!(f)?;

        heading(
            f,
            &format!("MISSING DOCUMENTS ({})", result.missing_documents.len()),
        )?;
        if result.missing_documents.is_empty() {
            writeln!(f, "None")?;
        }
        for doc_type in &result.missing_documents {
            writeln!(f, "- {} ({})", doc_type.display_name(), doc_type.key())?;
        }
        writeln!(f)?;

        heading(f, &format!("RED FLAGS ({})", result.red_flags.len()))?;
        if result.red_flags.is_empty() {
            writeln!(f, "None")?;
        }
        let grouped = grouped_by_severity(&result.red_flags);
        for severity in Severity::DESCENDING {
            let in_group: Vec<&&RedFlag> =
                grouped.iter().filter(|g| g.severity == severity).collect();
            if in_group.is_empty() {
                continue;
            }
            writeln!(
                f,
                "{} severity ({}):",
                capitalize(severity.label()),
                in_group.len()
            )?;
            for flag in in_group {
                writeln!(f, "{}", describe_flag(flag))?;
                if !flag.suggestion.is_empty() {
                    writeln!(f, "    Suggestion: {}", flag.suggestion)?;
                }
            }
        }
        writeln!(f)?;

        heading(f, "DOCUMENTS")?;
        if result.documents.is_empty() {
            writeln!(f, "No documents supplied")?;
        }
        for report in &result.documents {
            writeln!(f, "{}", describe_document(report))?;
        }
        writeln!(f)?;

        if !result.recommendations.is_empty() {
            heading(f, "RECOMMENDATIONS")?;
            for recommendation in &result.recommendations {
                writeln!(f, "• {}", recommendation)?;
            }
            writeln!(f)?;
        }

        heading(f, "DISCLAIMER")?;
        writeln!(f, "{}", DISCLAIMER)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{builtin_processes, check_process, ProcessDefinition};
    use pretty_assertions::assert_eq;
    use shared_types::{DocumentFailure, FailureKind, FlagLocation};

    fn flag(rule: &str, severity: Severity, location: Option<FlagLocation>) -> RedFlag {
        RedFlag {
            rule_id: rule.to_string(),
            severity,
            description: format!("{} description", rule),
            suggestion: String::new(),
            document: "aoa.docx".to_string(),
            location,
        }
    }

    fn sample_result() -> ProcessResult {
        let process = ProcessDefinition::from_spec(&builtin_processes()[0]);
        check_process(
            &process,
            vec![
                DocumentReport::Analyzed {
                    source: "aoa.docx".to_string(),
                    classification: Classification::Classified {
                        document_type: DocumentType::ArticlesOfAssociation,
                        confidence: 0.5,
                        matched_phrases: vec![],
                    },
                    word_count: 40,
                    paragraph_count: 4,
                    table_count: 0,
                    red_flags: vec![
                        flag("incomplete_signatures", Severity::Medium, None),
                        flag(
                            "jurisdiction_issues",
                            Severity::High,
                            Some(FlagLocation {
                                paragraph: 2,
                                snippet: "UAE Federal Courts".to_string(),
                            }),
                        ),
                        flag("missing_adgm_reference", Severity::High, None),
                    ],
                },
                DocumentReport::Failed {
                    source: "broken.docx".to_string(),
                    error: DocumentFailure {
                        kind: FailureKind::UnreadableDocument,
                        message: "Unreadable document: not a DOCX container".to_string(),
                    },
                },
            ],
        )
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("txt".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(66.666_666), 66.7);
        assert_eq!(round_one_decimal(50.0), 50.0);
    }

    #[test]
    fn test_grouping_is_stable_within_severity() {
        let flags = vec![
            flag("a", Severity::Low, None),
            flag("b", Severity::High, None),
            flag("c", Severity::Medium, None),
            flag("d", Severity::High, None),
        ];
        let ids: Vec<&str> = grouped_by_severity(&flags)
            .into_iter()
            .map(|f| f.rule_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_json_structure() {
        let bytes = render(&sample_result(), ReportFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["process_name"], "Company Incorporation");
        assert_eq!(json["overall_status"], "non_compliant");
        assert_eq!(json["completion_percentage"], 25.0);
        assert_eq!(json["red_flags"], 3);
        assert_eq!(json["high_severity_issues"], 2);
        assert_eq!(json["documents_failed"], 1);
        assert_eq!(json["missing_documents"][0], "board_resolution");
        assert_eq!(json["flags"][0]["rule_id"], "jurisdiction_issues");
        assert_eq!(json["flags"][2]["rule_id"], "incomplete_signatures");
        assert_eq!(json["documents"][1]["status"], "failed");
        assert_eq!(json["documents"][1]["error"]["kind"], "unreadable_document");
    }

    #[test]
    fn test_json_parses_back_into_structured_report() {
        let result = sample_result();
        let bytes = render_json(&result).unwrap();
        let parsed: StructuredReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, StructuredReport::from_result(&result));
    }

    #[test]
    fn test_text_report_sections() {
        let text = render_text(&sample_result());
        assert!(text.starts_with(TITLE));
        assert!(text.contains("Status: NON COMPLIANT"));
        assert!(text.contains("Completion: 25.0%"));
        assert!(text.contains("- UBO Declaration Form (ubo_declaration)"));
        assert!(text.contains("High severity (2):"));
        assert!(text.contains("at paragraph 3: \"UAE Federal Courts\""));
        assert!(text.contains("broken.docx: COULD NOT ANALYZE"));
        assert!(text.contains("• Verify ADGM compliance before submission"));

        let high = text.find("[HIGH]").unwrap();
        let medium = text.find("[MEDIUM]").unwrap();
        assert!(high < medium);
    }

    #[test]
    fn test_text_report_streams_every_section() {
        let result = sample_result();
        let mut streamed = String::new();
        std::fmt::Write::write_fmt(&mut streamed, format_args!("{}", TextReport(&result))).unwrap();

        assert_eq!(streamed, render_text(&result));
        assert!(streamed.ends_with(&format!("DISCLAIMER\n----------\n{}\n", DISCLAIMER)));
    }

    #[test]
    fn test_text_distinguishes_clean_from_failed() {
        let process = ProcessDefinition::from_spec(&builtin_processes()[2]);
        let result = check_process(
            &process,
            vec![DocumentReport::Analyzed {
                source: "contract.docx".to_string(),
                classification: Classification::Classified {
                    document_type: DocumentType::EmploymentContract,
                    confidence: 0.8,
                    matched_phrases: vec![],
                },
                word_count: 100,
                paragraph_count: 10,
                table_count: 1,
                red_flags: vec![],
            }],
        );
        let text = render_text(&result);
        assert!(text.contains("contract.docx: Employment Contract (confidence 80%), analyzed, no red flags found"));
        assert!(text.contains("Status: COMPLIANT"));
        assert!(!text.contains("COULD NOT ANALYZE"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let result = sample_result();
        assert_eq!(
            render(&result, ReportFormat::Text).unwrap(),
            render(&result, ReportFormat::Text).unwrap()
        );
        assert_eq!(
            render(&result, ReportFormat::Json).unwrap(),
            render(&result, ReportFormat::Json).unwrap()
        );
    }
}
