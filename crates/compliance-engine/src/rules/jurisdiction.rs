//! Jurisdiction and governing-law rules
//!
//! ADGM documents must name ADGM Courts and ADGM law. References to onshore
//! UAE courts or federal law are red flags.

use shared_types::Severity;

use super::{PatternSpec, Polarity, RuleSpec};

const ADGM_PHRASES: &[&str] = &["adgm", "abu dhabi global market"];

/// Rules that flag wrong jurisdiction or a governing-law clause without ADGM
pub fn forbidden_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec {
            id: "jurisdiction_issues".to_string(),
            polarity: Polarity::ForbidPresent,
            severity: Severity::High,
            description: "Incorrect jurisdiction - should reference ADGM Courts".to_string(),
            suggestion: "Replace the court reference with the exclusive jurisdiction of ADGM Courts"
                .to_string(),
            patterns: vec![
                PatternSpec::new("uae federal court"),
                PatternSpec::new("dubai court"),
                PatternSpec::unless("abu dhabi court", &["global market"]),
                PatternSpec::new("federal law"),
                PatternSpec::new("emirates law"),
            ],
            applies_to: Vec::new(),
        },
        RuleSpec {
            id: "missing_adgm_governing_law".to_string(),
            polarity: Polarity::ForbidPresent,
            severity: Severity::High,
            description: "Governing law clause does not reference ADGM".to_string(),
            suggestion: "State that the document is governed by the laws of the Abu Dhabi Global Market"
                .to_string(),
            patterns: vec![PatternSpec::unless("governing law", ADGM_PHRASES)],
            applies_to: Vec::new(),
        },
    ]
}

/// Rules that require an ADGM reference somewhere in the document
pub fn required_rules() -> Vec<RuleSpec> {
    vec![RuleSpec {
        id: "missing_adgm_reference".to_string(),
        polarity: Polarity::RequirePresent,
        severity: Severity::High,
        description: "Document does not reference ADGM or Abu Dhabi Global Market".to_string(),
        suggestion: "Add proper ADGM governing law clause".to_string(),
        patterns: ADGM_PHRASES.iter().map(|p| PatternSpec::new(p)).collect(),
        applies_to: Vec::new(),
    }]
}
