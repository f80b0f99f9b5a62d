use serde::Serialize;

use super::MatchPolicy;
use crate::advisor::domain::UserProfile;
use crate::catalog::{Scheme, SchemeLevel};

/// Trim and lowercase before any comparison. Applied uniformly to scheme data
/// and profile input so mismatched casing never causes silent false negatives.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// The five independent checks conjoined into the eligibility predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Age,
    Education,
    Gender,
    Occupation,
    Geography,
}

impl RuleKind {
    pub const fn label(self) -> &'static str {
        match self {
            RuleKind::Age => "age",
            RuleKind::Education => "education",
            RuleKind::Gender => "gender",
            RuleKind::Occupation => "occupation",
            RuleKind::Geography => "geography",
        }
    }
}

/// Outcome of one rule against one scheme, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCheck {
    pub rule: RuleKind,
    pub passed: bool,
    pub notes: String,
}

const ANY_ONLY: &[&str] = &["any"];

/// One-directional equivalence table: a user's level unlocks itself and
/// lower/equivalent requirement tags, never higher ones. Unknown user tags
/// fall back to wildcard-only schemes.
const EDUCATION_EQUIVALENCE: &[(&str, &[&str])] = &[
    ("no formal education", ANY_ONLY),
    ("school", &["school", "any"]),
    ("higher secondary", &["higher secondary", "any"]),
    ("diploma", &["diploma", "any"]),
    ("undergraduate", &["undergraduate", "graduate", "any"]),
    ("postgraduate", &["postgraduate", "any"]),
    ("research", &["postgraduate", "any"]),
    ("skill training", &["skill training", "any"]),
    ("any", ANY_ONLY),
];

fn satisfied_education_tags(user_education: &str) -> &'static [&'static str] {
    let normalized = normalize(user_education);
    EDUCATION_EQUIVALENCE
        .iter()
        .find(|(level, _)| *level == normalized)
        .map(|(_, tags)| *tags)
        .unwrap_or(ANY_ONLY)
}

/// Evaluate every rule; the scheme is eligible iff all checks pass.
pub(crate) fn check_scheme(
    scheme: &Scheme,
    profile: &UserProfile,
    policy: &MatchPolicy,
) -> Vec<RuleCheck> {
    vec![
        age_check(scheme, profile),
        education_check(scheme, profile),
        gender_check(scheme, profile),
        occupation_check(scheme, profile, policy),
        geography_check(scheme, profile),
    ]
}

pub(crate) fn is_eligible(scheme: &Scheme, profile: &UserProfile, policy: &MatchPolicy) -> bool {
    check_scheme(scheme, profile, policy)
        .iter()
        .all(|check| check.passed)
}

fn age_check(scheme: &Scheme, profile: &UserProfile) -> RuleCheck {
    match profile.age {
        // Age filtering is opt-in from the user's side.
        None => RuleCheck {
            rule: RuleKind::Age,
            passed: true,
            notes: "no age provided, check skipped".to_string(),
        },
        Some(age) => {
            let within = scheme.min_age <= age && age <= scheme.max_age;
            RuleCheck {
                rule: RuleKind::Age,
                passed: within,
                notes: if within {
                    format!("age {age} within {}-{}", scheme.min_age, scheme.max_age)
                } else {
                    format!("age {age} outside {}-{}", scheme.min_age, scheme.max_age)
                },
            }
        }
    }
}

fn education_check(scheme: &Scheme, profile: &UserProfile) -> RuleCheck {
    let required = normalize(&scheme.education_level);
    if required == "any" {
        return RuleCheck {
            rule: RuleKind::Education,
            passed: true,
            notes: "scheme is open to any education level".to_string(),
        };
    }

    let user_education = profile.education_text().unwrap_or("Any");
    let satisfied = satisfied_education_tags(user_education).contains(&required.as_str());
    RuleCheck {
        rule: RuleKind::Education,
        passed: satisfied,
        notes: if satisfied {
            format!("'{user_education}' satisfies requirement '{}'", scheme.education_level)
        } else {
            format!(
                "'{user_education}' does not satisfy requirement '{}'",
                scheme.education_level
            )
        },
    }
}

fn gender_check(scheme: &Scheme, profile: &UserProfile) -> RuleCheck {
    let Some(gender) = profile.gender_text() else {
        return RuleCheck {
            rule: RuleKind::Gender,
            passed: true,
            notes: "no gender provided, check skipped".to_string(),
        };
    };

    // Lenient policy: an empty eligibility list means no gender restriction.
    if scheme.eligible_gender.is_empty() {
        return RuleCheck {
            rule: RuleKind::Gender,
            passed: true,
            notes: "scheme has no gender restriction".to_string(),
        };
    }

    let normalized = normalize(gender);
    let listed = scheme
        .eligible_gender
        .iter()
        .any(|eligible| normalize(eligible) == normalized);
    RuleCheck {
        rule: RuleKind::Gender,
        passed: listed,
        notes: if listed {
            format!("'{gender}' is listed as eligible")
        } else {
            format!("'{gender}' is not in the eligible gender list")
        },
    }
}

fn occupation_check(scheme: &Scheme, profile: &UserProfile, policy: &MatchPolicy) -> RuleCheck {
    let occupations: Vec<String> = scheme
        .eligible_occupation
        .iter()
        .map(|occupation| normalize(occupation))
        .collect();

    if occupations.iter().any(|occupation| occupation == "all") {
        return RuleCheck {
            rule: RuleKind::Occupation,
            passed: true,
            notes: "scheme is open to all occupations".to_string(),
        };
    }

    let occupation = profile
        .occupation_text()
        .unwrap_or(&policy.default_occupation);
    let listed = occupations.contains(&normalize(occupation));
    RuleCheck {
        rule: RuleKind::Occupation,
        passed: listed,
        notes: if listed {
            format!("'{occupation}' is listed as eligible")
        } else {
            format!("'{occupation}' is not in the eligible occupation list")
        },
    }
}

fn geography_check(scheme: &Scheme, profile: &UserProfile) -> RuleCheck {
    match scheme.scheme_level {
        SchemeLevel::Central => RuleCheck {
            rule: RuleKind::Geography,
            passed: true,
            notes: "central scheme, valid in every state".to_string(),
        },
        SchemeLevel::State => {
            let scheme_state = normalize(scheme.state.as_deref().unwrap_or(""));
            let user_state = normalize(profile.state_text().unwrap_or(""));
            let matches = !scheme_state.is_empty() && scheme_state == user_state;
            RuleCheck {
                rule: RuleKind::Geography,
                passed: matches,
                notes: if matches {
                    format!("state scheme available in {}", profile.state_text().unwrap_or(""))
                } else {
                    format!(
                        "state scheme restricted to {}",
                        scheme.state.as_deref().unwrap_or("an unspecified state")
                    )
                },
            }
        }
    }
}
