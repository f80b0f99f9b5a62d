//! Deterministic eligibility matching.
//!
//! The engine applies five independent checks as a conjunction, preserving
//! catalog order among matches (stable filter, never a re-sort). The adopted
//! rule policy is the lenient normalized variant: comparisons are trimmed and
//! lowercased on both sides, an empty gender list means "no restriction", and
//! education matches through a fixed one-directional equivalence table.

mod policy;
mod rules;

use std::sync::Arc;

pub use policy::MatchBasis;
pub use rules::{RuleCheck, RuleKind};

use super::domain::UserProfile;
use crate::catalog::{Scheme, SchemeCatalog};

/// Tunable knobs for the matching run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    /// Maximum number of schemes in a fallback shortlist.
    pub fallback_cap: usize,
    /// Occupation assumed when the profile leaves it unset.
    pub default_occupation: String,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            fallback_cap: 3,
            default_occupation: "Citizen".to_string(),
        }
    }
}

/// Stateless evaluator mapping a profile plus the catalog to a shortlist.
pub struct EligibilityEngine {
    policy: MatchPolicy,
}

impl EligibilityEngine {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Evaluate every scheme against the profile. Never fails for a
    /// well-formed profile; missing scheme fields already received defaults
    /// at load time. When the strict filter yields nothing, the permissive
    /// fallback shortlist is returned and flagged as such.
    pub fn filter(&self, profile: &UserProfile, catalog: &SchemeCatalog) -> MatchOutcome {
        let mut matches: Vec<Arc<Scheme>> = Vec::new();
        for scheme in catalog.schemes() {
            if rules::is_eligible(scheme, profile, &self.policy) {
                matches.push(scheme.clone());
            }
        }

        if matches.is_empty() {
            let shortlist = policy::fallback_shortlist(catalog, profile, &self.policy);
            if !shortlist.is_empty() {
                return MatchOutcome {
                    schemes: shortlist,
                    basis: MatchBasis::Fallback,
                };
            }
        }

        MatchOutcome {
            schemes: matches,
            basis: MatchBasis::Exact,
        }
    }

    /// Per-rule breakdown for one scheme, for audit output.
    pub fn audit(&self, profile: &UserProfile, scheme: &Scheme) -> Vec<RuleCheck> {
        rules::check_scheme(scheme, profile, &self.policy)
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

/// Result of one matching run.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Sub-sequence of the catalog in original order.
    pub schemes: Vec<Arc<Scheme>>,
    pub basis: MatchBasis,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
