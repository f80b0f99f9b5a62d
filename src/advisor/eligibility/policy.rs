use std::sync::Arc;

use serde::Serialize;

use super::rules::normalize;
use super::MatchPolicy;
use crate::advisor::domain::UserProfile;
use crate::catalog::{Scheme, SchemeCatalog, SchemeLevel};

/// Whether a shortlist came from the strict conjunctive filter or the
/// permissive fallback. Callers surface fallback results as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    Exact,
    Fallback,
}

impl MatchBasis {
    pub const fn label(self) -> &'static str {
        match self {
            MatchBasis::Exact => "exact",
            MatchBasis::Fallback => "fallback",
        }
    }
}

/// Best-effort shortlist used when the exact filter comes back empty: central
/// schemes plus state schemes matching the user's state, in catalog order,
/// capped so the user is never shown a dead end or an overwhelming dump.
pub(crate) fn fallback_shortlist(
    catalog: &SchemeCatalog,
    profile: &UserProfile,
    policy: &MatchPolicy,
) -> Vec<Arc<Scheme>> {
    let user_state = normalize(profile.state_text().unwrap_or(""));
    let mut shortlist = Vec::new();

    for scheme in catalog.schemes() {
        match scheme.scheme_level {
            SchemeLevel::Central => shortlist.push(scheme.clone()),
            SchemeLevel::State => {
                let scheme_state = normalize(scheme.state.as_deref().unwrap_or(""));
                if !scheme_state.is_empty() && scheme_state == user_state {
                    shortlist.push(scheme.clone());
                }
            }
        }

        if shortlist.len() >= policy.fallback_cap {
            break;
        }
    }

    shortlist
}
