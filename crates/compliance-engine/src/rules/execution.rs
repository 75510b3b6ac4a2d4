//! Execution formalities: unsigned signature blocks and placeholder dates

use shared_types::Severity;

use super::{PatternSpec, Polarity, RuleSpec};

pub fn rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec {
            id: "incomplete_signatures".to_string(),
            polarity: Polarity::ForbidPresent,
            severity: Severity::Medium,
            description: "Incomplete signature sections found".to_string(),
            suggestion: "Ensure every signature block is signed by an authorised signatory"
                .to_string(),
            patterns: vec![
                PatternSpec::new(r"signature.*blank"),
                PatternSpec::new(r"\[signature\]"),
                PatternSpec::new(r"sign here"),
                PatternSpec::new(r"_+.*signature"),
            ],
            applies_to: Vec::new(),
        },
        RuleSpec {
            id: "missing_dates".to_string(),
            polarity: Polarity::ForbidPresent,
            severity: Severity::Medium,
            description: "Missing or placeholder dates found".to_string(),
            suggestion: "Replace placeholder dates with the actual execution dates".to_string(),
            patterns: vec![
                PatternSpec::new(r"date.*blank"),
                PatternSpec::new(r"\[date\]"),
                PatternSpec::new(r"dd/mm/yyyy"),
                PatternSpec::new(r"_+.*date"),
            ],
            applies_to: Vec::new(),
        },
    ]
}
