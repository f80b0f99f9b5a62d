use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::eligibility::MatchBasis;
use crate::catalog::Scheme;

/// Identifier wrapper for active conversations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One side of an exchange; the transcript is append-only within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: ChatRole,
    pub content: String,
}

/// The profile attributes required before a recommendation can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Age,
    Education,
    Gender,
    Occupation,
    State,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::Age,
        ProfileField::Education,
        ProfileField::Gender,
        ProfileField::Occupation,
        ProfileField::State,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::Education => "education",
            ProfileField::Gender => "gender",
            ProfileField::Occupation => "occupation",
            ProfileField::State => "state",
        }
    }
}

/// Error raised when a profile field value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("age must be a whole number between 0 and 150, got '{0}'")]
    InvalidAge(String),
}

/// User-supplied attribute set tested against scheme eligibility rules.
///
/// A field counts as missing when unset or blank after trimming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub education: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub state: Option<String>,
}

impl UserProfile {
    /// Apply one UI input event. Blank input clears the field.
    pub fn set_field(&mut self, field: ProfileField, value: &str) -> Result<(), ProfileError> {
        let trimmed = value.trim();
        match field {
            ProfileField::Age => {
                if trimmed.is_empty() {
                    self.age = None;
                } else {
                    let age = trimmed
                        .parse::<u32>()
                        .ok()
                        .filter(|age| *age <= 150)
                        .ok_or_else(|| ProfileError::InvalidAge(trimmed.to_string()))?;
                    self.age = Some(age);
                }
            }
            ProfileField::Education => self.education = non_blank(trimmed),
            ProfileField::Gender => self.gender = non_blank(trimmed),
            ProfileField::Occupation => self.occupation = non_blank(trimmed),
            ProfileField::State => self.state = non_blank(trimmed),
        }
        Ok(())
    }

    fn has(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Age => self.age.is_some(),
            ProfileField::Education => text(&self.education).is_some(),
            ProfileField::Gender => text(&self.gender).is_some(),
            ProfileField::Occupation => text(&self.occupation).is_some(),
            ProfileField::State => text(&self.state).is_some(),
        }
    }

    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn education_text(&self) -> Option<&str> {
        text(&self.education)
    }

    pub fn gender_text(&self) -> Option<&str> {
        text(&self.gender)
    }

    pub fn occupation_text(&self) -> Option<&str> {
        text(&self.occupation)
    }

    pub fn state_text(&self) -> Option<&str> {
        text(&self.state)
    }
}

fn non_blank(trimmed: &str) -> Option<String> {
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Phase of the selection/follow-up state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    CollectingProfile,
    AwaitingSelection,
    SchemeSelected,
}

impl ConversationPhase {
    pub const fn label(self) -> &'static str {
        match self {
            ConversationPhase::CollectingProfile => "collecting_profile",
            ConversationPhase::AwaitingSelection => "awaiting_selection",
            ConversationPhase::SchemeSelected => "scheme_selected",
        }
    }
}

/// Working state for one active conversation.
///
/// An explicit value passed into and returned from each turn-processing call;
/// there is no ambient session object, so independent conversations can run
/// concurrently and tests stay straightforward.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub started_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub transcript: Vec<TranscriptEntry>,
    /// Set once per recommendation request, read-only until the next request.
    pub shortlist: Vec<Arc<Scheme>>,
    pub shortlist_basis: Option<MatchBasis>,
    /// Shared reference into the catalog; the engine never mutates schemes.
    pub selected_scheme: Option<Arc<Scheme>>,
    pub awaiting_selection: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            profile: UserProfile::default(),
            transcript: Vec::new(),
            shortlist: Vec::new(),
            shortlist_basis: None,
            selected_scheme: None,
            awaiting_selection: false,
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        if self.awaiting_selection {
            ConversationPhase::AwaitingSelection
        } else if self.selected_scheme.is_some() {
            ConversationPhase::SchemeSelected
        } else {
            ConversationPhase::CollectingProfile
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    /// Clear recommendation artifacts before re-running the engine.
    pub fn clear_recommendation(&mut self) {
        self.shortlist.clear();
        self.shortlist_basis = None;
        self.selected_scheme = None;
        self.awaiting_selection = false;
    }

    /// Convert into the read-only past-chat record kept by the store.
    pub fn into_archive(self, title: String) -> ArchivedChat {
        ArchivedChat {
            title,
            started_at: self.started_at,
            transcript: self.transcript,
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only record of a finished conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedChat {
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub transcript: Vec<TranscriptEntry>,
}
