//! Scheme catalog domain types and the JSON loader.
//!
//! The loader parses the catalog into immutable records and performs no
//! field-level validation; absent fields receive the documented defaults so
//! the eligibility engine never has to special-case partially specified
//! schemes. Scheme names are assumed unique within a catalog; the loader does
//! not enforce this.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Administrative level a scheme is offered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemeLevel {
    #[serde(alias = "central", alias = "CENTRAL")]
    Central,
    #[serde(alias = "state", alias = "STATE")]
    State,
}

impl SchemeLevel {
    pub const fn label(self) -> &'static str {
        match self {
            SchemeLevel::Central => "Central",
            SchemeLevel::State => "State",
        }
    }
}

fn default_max_age() -> u32 {
    100
}

fn default_education() -> String {
    "Any".to_string()
}

fn default_occupations() -> Vec<String> {
    vec!["All".to_string()]
}

/// A government program/benefit record. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub scheme_name: String,
    pub scheme_level: SchemeLevel,
    /// Required for state-level schemes, irrelevant for central ones.
    #[serde(default)]
    pub state: Option<String>,
    /// Free-text badge such as "Scholarship" or "Pension".
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_age: u32,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
    /// Education tag from the known vocabulary, or the wildcard "Any".
    #[serde(default = "default_education")]
    pub education_level: String,
    /// Empty means no gender restriction.
    #[serde(default)]
    pub eligible_gender: Vec<String>,
    /// The wildcard "All" opens the scheme to every occupation.
    #[serde(default = "default_occupations")]
    pub eligible_occupation: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub how_to_apply: String,
    #[serde(default)]
    pub documents_required: Vec<String>,
    /// Calendar date text, the sentinel "rolling", or absent.
    #[serde(default)]
    pub last_date: Option<String>,
    #[serde(default)]
    pub application_url: Option<String>,
}

impl Scheme {
    pub fn deadline(&self) -> Deadline<'_> {
        match self.last_date.as_deref().map(str::trim) {
            None | Some("") => Deadline::NoFixedDate,
            Some(raw) if raw.eq_ignore_ascii_case("rolling") => Deadline::Rolling,
            Some(raw) => Deadline::Fixed(raw),
        }
    }
}

/// Interpreted view of a scheme's `last_date` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline<'a> {
    NoFixedDate,
    Rolling,
    Fixed(&'a str),
}

/// Ordered, read-only collection of schemes shared across conversations.
#[derive(Debug, Clone, Default)]
pub struct SchemeCatalog {
    schemes: Vec<Arc<Scheme>>,
}

impl SchemeCatalog {
    /// Read and parse the catalog file. Pure function of the file content, so
    /// re-reading is safe and idempotent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Unavailable {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let schemes: Vec<Scheme> = serde_json::from_str(raw)?;
        Ok(Self::from_schemes(schemes))
    }

    pub fn from_schemes(schemes: Vec<Scheme>) -> Self {
        Self {
            schemes: schemes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn schemes(&self) -> &[Arc<Scheme>] {
        &self.schemes
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Error raised when the catalog source cannot be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("scheme catalog unavailable at {path}: {source}")]
    Unavailable {
        path: String,
        source: std::io::Error,
    },
    #[error("scheme catalog is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_receive_documented_defaults() {
        let catalog = SchemeCatalog::from_json(
            r#"[{"scheme_name": "Sample Grant", "scheme_level": "Central"}]"#,
        )
        .expect("minimal record parses");

        let scheme = &catalog.schemes()[0];
        assert_eq!(scheme.min_age, 0);
        assert_eq!(scheme.max_age, 100);
        assert_eq!(scheme.education_level, "Any");
        assert!(scheme.eligible_gender.is_empty());
        assert_eq!(scheme.eligible_occupation, vec!["All".to_string()]);
        assert_eq!(scheme.deadline(), Deadline::NoFixedDate);
    }

    #[test]
    fn rolling_sentinel_is_case_insensitive() {
        let catalog = SchemeCatalog::from_json(
            r#"[{"scheme_name": "S", "scheme_level": "State", "state": "Bihar", "last_date": "Rolling"}]"#,
        )
        .expect("record parses");
        assert_eq!(catalog.schemes()[0].deadline(), Deadline::Rolling);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = SchemeCatalog::from_json("{not json");
        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = SchemeCatalog::load("/nonexistent/schemes.json");
        match result {
            Err(CatalogError::Unavailable { path, .. }) => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("expected unavailable error, got {other:?}"),
        }
    }
}
