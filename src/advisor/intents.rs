//! Interpretation of user messages after a shortlist exists.
//!
//! Both the selection matcher and the follow-up classifier are deliberately
//! simple substring machinery; the classifier's check order is a documented
//! contract because keywords overlap (e.g. "tell me about eligibility"
//! classifies as Explanation since "tell me" is checked first).

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Scheme;

/// Follow-up question categories, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpIntent {
    Explanation,
    Documents,
    Benefits,
    Deadline,
    AgeRange,
    Apply,
    Eligibility,
    Reasoning,
    General,
}

impl FollowUpIntent {
    pub const fn label(self) -> &'static str {
        match self {
            FollowUpIntent::Explanation => "explanation",
            FollowUpIntent::Documents => "documents",
            FollowUpIntent::Benefits => "benefits",
            FollowUpIntent::Deadline => "deadline",
            FollowUpIntent::AgeRange => "age_range",
            FollowUpIntent::Apply => "apply",
            FollowUpIntent::Eligibility => "eligibility",
            FollowUpIntent::Reasoning => "reasoning",
            FollowUpIntent::General => "general",
        }
    }

    /// Intents answered by the text-generation collaborator rather than read
    /// directly from scheme fields.
    pub const fn is_generative(self) -> bool {
        matches!(
            self,
            FollowUpIntent::Explanation
                | FollowUpIntent::Eligibility
                | FollowUpIntent::Reasoning
                | FollowUpIntent::General
        )
    }
}

/// Ordered (keywords, intent) pairs, evaluated first-match-wins.
const INTENT_KEYWORDS: &[(FollowUpIntent, &[&str])] = &[
    (
        FollowUpIntent::Explanation,
        &["explain", "overview", "details", "tell me"],
    ),
    (FollowUpIntent::Documents, &["document"]),
    (FollowUpIntent::Benefits, &["benefit"]),
    (FollowUpIntent::Deadline, &["deadline", "last date"]),
    (FollowUpIntent::AgeRange, &["age"]),
    (FollowUpIntent::Apply, &["apply", "portal", "url"]),
    (FollowUpIntent::Eligibility, &["eligibility"]),
    (FollowUpIntent::Reasoning, &["why", "suitable"]),
];

pub fn classify(message: &str) -> FollowUpIntent {
    let text = message.to_lowercase();
    for (intent, keywords) in INTENT_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return *intent;
        }
    }
    FollowUpIntent::General
}

/// Match a message against the cached shortlist. Two rules tried in order:
/// the trimmed message equal to a 1-based ordinal, then the scheme name as a
/// case-insensitive substring of the message. First match wins.
pub fn match_selection(message: &str, shortlist: &[Arc<Scheme>]) -> Option<Arc<Scheme>> {
    let trimmed = message.trim();
    let lowered = message.to_lowercase();

    for (index, scheme) in shortlist.iter().enumerate() {
        let ordinal = (index + 1).to_string();
        if trimmed == ordinal {
            return Some(scheme.clone());
        }
        // A blank name must never act as a match-everything substring.
        let name = scheme.scheme_name.trim();
        if !name.is_empty() && lowered.contains(&name.to_lowercase()) {
            return Some(scheme.clone());
        }
    }

    None
}
