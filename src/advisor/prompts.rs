//! Prompt templates for the text-generation collaborator.
//!
//! Scheme text fields are untrusted for formatting: control characters are
//! stripped, whitespace collapsed, and length capped before any field is
//! embedded into a templated instruction, so catalog content cannot corrupt
//! the prompt structure.

use crate::advisor::domain::UserProfile;
use crate::catalog::Scheme;

const MAX_EMBEDDED_LEN: usize = 1200;

pub(crate) fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(MAX_EMBEDDED_LEN));
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    // The cap counts characters, not bytes, so multi-byte text is not
    // truncated mid-character and never exceeds the limit.
    if let Some((cut, _)) = out.char_indices().nth(MAX_EMBEDDED_LEN) {
        out.truncate(cut);
    }

    out
}

pub(crate) fn explanation_prompt(scheme: &Scheme) -> String {
    format!(
        "Explain this government scheme in very simple English.\n\
         Use short sentences.\n\
         Do not repeat points.\n\n\
         Scheme: {}\n\
         Description: {}\n\
         Benefits: {}",
        sanitize(&scheme.scheme_name),
        sanitize(&scheme.description),
        sanitize(&scheme.benefits),
    )
}

pub(crate) fn eligibility_prompt(scheme: &Scheme) -> String {
    format!(
        "Explain eligibility clearly for a common citizen:\n\n{}",
        sanitize(&scheme.description),
    )
}

pub(crate) fn reasoning_prompt(scheme: &Scheme, profile: &UserProfile) -> String {
    format!(
        "You are a government scheme assistant.\n\
         Explain in simple English why this scheme is suitable for the user.\n\
         Do not repeat the scheme description.\n\
         Mention matching factors like age, education, occupation, or state.\n\
         Keep it short, two to three sentences.\n\n\
         User profile:\n\
         - Age: {}\n\
         - Education: {}\n\
         - Occupation: {}\n\
         - State: {}\n\n\
         Scheme:\n\
         - Name: {}\n\
         - Level: {}",
        profile.age.map_or_else(|| "unknown".to_string(), |age| age.to_string()),
        sanitize(profile.education_text().unwrap_or("unknown")),
        sanitize(profile.occupation_text().unwrap_or("unknown")),
        sanitize(profile.state_text().unwrap_or("unknown")),
        sanitize(&scheme.scheme_name),
        scheme.scheme_level.label(),
    )
}

pub(crate) fn general_prompt(scheme: &Scheme, question: &str) -> String {
    format!(
        "Answer the user's question politely and clearly.\n\
         If the information is not guaranteed, say so.\n\n\
         User question: {}\n\
         Scheme: {}\n\
         Description: {}",
        sanitize(question),
        sanitize(&scheme.scheme_name),
        sanitize(&scheme.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_control_characters_and_collapses_whitespace() {
        let cleaned = sanitize("line one\n\nline\ttwo\u{7}  end ");
        assert_eq!(cleaned, "line one line two end");
    }

    #[test]
    fn sanitize_caps_embedded_length() {
        let long = "x".repeat(5000);
        assert!(sanitize(&long).len() <= MAX_EMBEDDED_LEN);
    }

    #[test]
    fn sanitize_cap_counts_characters_not_bytes() {
        let long = "é".repeat(MAX_EMBEDDED_LEN + 50);
        let cleaned = sanitize(&long);
        assert_eq!(cleaned.chars().count(), MAX_EMBEDDED_LEN);
        assert!(cleaned.chars().all(|ch| ch == 'é'));
    }
}
