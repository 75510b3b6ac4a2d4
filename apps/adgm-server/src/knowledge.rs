//! Static ADGM guidance lookup
//!
//! Questions are matched to topics by keyword. No match yields a general
//! overview.

use serde::Serialize;

pub struct Topic {
    pub key: &'static str,
    pub title: &'static str,
    keywords: &'static [&'static str],
    pub guidance: &'static str,
}

pub const TOPICS: &[Topic] = &[
    Topic {
        key: "incorporation",
        title: "Company Incorporation Requirements",
        keywords: &["incorporat", "company", "articles", "register", "setup", "set up"],
        guidance: "Incorporating a company in ADGM requires Articles of Association, \
a Board Resolution, a UBO Declaration and a Register of Members and Directors. \
All documents must reference ADGM jurisdiction and use ADGM templates where available.",
    },
    Topic {
        key: "jurisdiction",
        title: "ADGM Jurisdiction",
        keywords: &["court", "jurisdiction", "governing law", "dispute", "federal"],
        guidance: "Documents must name ADGM Courts and the laws of the Abu Dhabi Global Market. \
References to UAE Federal Courts, Dubai Courts or UAE federal law are red flags.",
    },
    Topic {
        key: "ubo",
        title: "Ultimate Beneficial Owner Declaration",
        keywords: &["ubo", "beneficial", "owner", "25%"],
        guidance: "Declare every individual who holds 25% or more of the shares or voting rights, \
or who otherwise controls the company. Include full name, nationality, \
residential address and the nature of the control.",
    },
    Topic {
        key: "employment",
        title: "Employment Contract Standards",
        keywords: &["employ", "salary", "probation", "annual leave", "working hours"],
        guidance: "ADGM employment contracts state job title, duties, salary and benefits. \
Working hours are at most 48 per week, annual leave is at least 30 days and \
probation is at most six months. Termination must follow the ADGM Employment Regulations.",
    },
];

const OVERVIEW: &str = "General ADGM guidance: reference ADGM Courts and ADGM law, \
supply every document the process requires, declare beneficial owners holding 25% or more \
and use ADGM standard templates.";

const NOTE: &str =
    "This guidance is not legal advice. Consult qualified legal professionals for official submissions.";

#[derive(Debug, Serialize)]
pub struct Answer {
    pub answer: String,
    pub topics: Vec<&'static str>,
}

pub fn answer(question: &str) -> Answer {
    let question = question.to_lowercase();
    let matched: Vec<&Topic> = TOPICS
        .iter()
        .filter(|t| t.keywords.iter().any(|k| question.contains(k)))
        .collect();

    if matched.is_empty() {
        return Answer {
            answer: format!("{}\n\n{}", OVERVIEW, NOTE),
            topics: Vec::new(),
        };
    }

    let body: Vec<String> = matched
        .iter()
        .map(|t| format!("{}\n{}", t.title, t.guidance))
        .collect();
    Answer {
        answer: format!("{}\n\n{}", body.join("\n\n"), NOTE),
        topics: matched.iter().map(|t| t.key).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_court_question_maps_to_jurisdiction() {
        let answer = answer("Which court should my documents name?");
        assert_eq!(answer.topics, vec!["jurisdiction"]);
        assert!(answer.answer.contains("ADGM Courts"));
    }

    #[test]
    fn test_question_can_match_several_topics() {
        let answer = answer("What UBO documents does company incorporation need?");
        assert_eq!(answer.topics, vec!["incorporation", "ubo"]);
    }

    #[test]
    fn test_unmatched_question_gets_overview() {
        let answer = answer("What time is it?");
        assert!(answer.topics.is_empty());
        assert!(answer.answer.starts_with("General ADGM guidance"));
    }
}
