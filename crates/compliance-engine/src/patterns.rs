//! Signature phrases for document classification and snippet helpers

/// Articles of Association
pub const ARTICLES_KEYWORDS: &[&str] = &[
    "articles of association",
    "company regulations",
    "share capital",
    "director powers",
];

/// Memorandum of Association
pub const MEMORANDUM_KEYWORDS: &[&str] = &[
    "memorandum of association",
    "subscribers",
    "objects of the company",
];

/// Board Resolution
pub const BOARD_RESOLUTION_KEYWORDS: &[&str] = &[
    "board resolution",
    "resolved that",
    "directors resolve",
    "board of directors",
];

/// Shareholder Resolution
pub const SHAREHOLDER_RESOLUTION_KEYWORDS: &[&str] = &[
    "shareholder resolution",
    "shareholders resolve",
    "written resolution of the shareholders",
];

/// Incorporation Application Form
pub const INCORPORATION_FORM_KEYWORDS: &[&str] = &[
    "incorporation",
    "application for registration",
    "company registration",
];

/// UBO Declaration Form
pub const UBO_KEYWORDS: &[&str] = &[
    "ultimate beneficial owner",
    "ubo declaration",
    "beneficial ownership",
    "25%",
];

/// Register of Members and Directors
pub const REGISTER_KEYWORDS: &[&str] = &[
    "register of members",
    "register of directors",
    "members and directors",
];

/// Employment Contract
pub const EMPLOYMENT_KEYWORDS: &[&str] = &[
    "employment contract",
    "terms of employment",
    "employee",
    "employer",
    "salary",
];

/// Commercial Agreement
pub const COMMERCIAL_KEYWORDS: &[&str] = &[
    "commercial agreement",
    "supply of goods",
    "service agreement",
    "the parties agree",
];

/// Compliance Policy Document
pub const COMPLIANCE_POLICY_KEYWORDS: &[&str] = &[
    "compliance policy",
    "anti-money laundering",
    "code of conduct",
    "compliance officer",
];

/// Characters of context kept on each side of a match
pub const SNIPPET_CONTEXT: usize = 50;

/// Extract a snippet around the byte span `start..end` of `text`.
/// Ellipses mark trimmed context.
pub fn extract_snippet(text: &str, start: usize, end: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(SNIPPET_CONTEXT));
    let to = ceil_char_boundary(text, end.saturating_add(SNIPPET_CONTEXT));

    let mut snippet = String::new();
    if from > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(text[from..to].trim());
    if to < text.len() {
        snippet.push_str("...");
    }
    snippet
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
