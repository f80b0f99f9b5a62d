use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    ArchivedChat, ConversationId, ConversationPhase, ConversationState, ProfileError,
    ProfileField, UserProfile,
};
use super::eligibility::{EligibilityEngine, MatchBasis, MatchPolicy};
use super::generation::TextGenerator;
use super::intents::{self, FollowUpIntent};
use super::prompts;
use super::store::{ConversationStore, StoreError};
use crate::catalog::{Deadline, Scheme, SchemeCatalog};

/// Service composing the catalog, eligibility engine, conversation store, and
/// generation backend behind the conversation boundary.
pub struct AdvisorService<S, G> {
    catalog: Arc<SchemeCatalog>,
    engine: EligibilityEngine,
    store: Arc<S>,
    generator: Arc<G>,
}

impl<S, G> AdvisorService<S, G>
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    pub fn new(catalog: Arc<SchemeCatalog>, store: Arc<S>, generator: Arc<G>) -> Self {
        Self::with_policy(catalog, store, generator, MatchPolicy::default())
    }

    pub fn with_policy(
        catalog: Arc<SchemeCatalog>,
        store: Arc<S>,
        generator: Arc<G>,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            catalog,
            engine: EligibilityEngine::new(policy),
            store,
            generator,
        }
    }

    pub fn catalog(&self) -> &SchemeCatalog {
        &self.catalog
    }

    pub fn start_conversation(&self) -> Result<ConversationId, AdvisorServiceError> {
        Ok(self.store.create()?)
    }

    /// Apply one profile input event and report which fields are still missing.
    pub fn submit_profile_field(
        &self,
        id: &ConversationId,
        field: ProfileField,
        value: &str,
    ) -> Result<ProfileView, AdvisorServiceError> {
        let mut state = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        state.profile.set_field(field, value)?;
        let view = ProfileView {
            profile: state.profile.clone(),
            missing: state.profile.missing_fields(),
        };
        self.store.save(id, state)?;
        Ok(view)
    }

    /// Drive the state machine one turn and persist the updated state.
    pub fn submit_message(
        &self,
        id: &ConversationId,
        message: &str,
    ) -> Result<TurnReply, AdvisorServiceError> {
        let state = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        let turn = self.run_turn(state, message);
        let reply = TurnReply {
            reply: turn.reply,
            phase: turn.state.phase(),
            event: turn.event,
        };
        self.store.save(id, turn.state)?;
        Ok(reply)
    }

    /// Archive the current transcript and start the conversation over.
    pub fn reset_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<ArchivedChat, AdvisorServiceError> {
        let state = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        let title = format!("Chat {}", self.store.archived()?.len() + 1);
        let chat = state.into_archive(title);
        self.store.push_archive(chat.clone())?;
        self.store.save(id, ConversationState::new())?;
        Ok(chat)
    }

    /// Read-only list of past chats.
    pub fn archived_chats(&self) -> Result<Vec<ArchivedChat>, AdvisorServiceError> {
        Ok(self.store.archived()?)
    }

    /// Process one user message against an explicit state value. One message
    /// in, one reply out, run to completion; every code path yields a
    /// non-empty reply string.
    pub fn run_turn(&self, mut state: ConversationState, message: &str) -> Turn {
        state.push_user(message);

        let (reply, event) = if state.awaiting_selection {
            self.selection_turn(&mut state, message)
        } else if let Some(scheme) = state.selected_scheme.clone() {
            self.follow_up_turn(&state, &scheme, message)
        } else {
            self.recommendation_turn(&mut state)
        };

        state.push_assistant(reply.clone());
        Turn {
            state,
            reply,
            event,
        }
    }

    fn recommendation_turn(&self, state: &mut ConversationState) -> (String, TurnEvent) {
        state.clear_recommendation();

        let missing = state.profile.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            let reply = format!("Please provide: {}", names.join(", "));
            return (reply, TurnEvent::IncompleteProfile { missing });
        }

        let outcome = self.engine.filter(&state.profile, &self.catalog);
        if outcome.is_empty() {
            return (
                "No schemes found for your profile.".to_string(),
                TurnEvent::NoSchemesFound,
            );
        }

        info!(
            count = outcome.schemes.len(),
            basis = outcome.basis.label(),
            "eligibility shortlist prepared"
        );

        let reply = render_shortlist(&outcome.schemes, outcome.basis);
        let event = TurnEvent::SchemesListed {
            basis: outcome.basis,
            count: outcome.schemes.len(),
        };

        state.shortlist = outcome.schemes;
        state.shortlist_basis = Some(outcome.basis);
        state.awaiting_selection = true;

        (reply, event)
    }

    fn selection_turn(&self, state: &mut ConversationState, message: &str) -> (String, TurnEvent) {
        match intents::match_selection(message, &state.shortlist) {
            Some(scheme) => {
                info!(scheme = %scheme.scheme_name, "scheme selected");
                let reply = format!(
                    "You selected {}.\n\n\
                     You can ask about:\n\
                     - benefits\n\
                     - eligibility\n\
                     - documents\n\
                     - age limits\n\
                     - deadline\n\
                     - how to apply\n\
                     - application portal\n\
                     - explanation",
                    scheme.scheme_name
                );
                let event = TurnEvent::SchemeSelected {
                    scheme_name: scheme.scheme_name.clone(),
                };
                state.selected_scheme = Some(scheme);
                state.awaiting_selection = false;
                (reply, event)
            }
            None => (
                "Please select a valid scheme number or scheme name.".to_string(),
                TurnEvent::SelectionRetry,
            ),
        }
    }

    fn follow_up_turn(
        &self,
        state: &ConversationState,
        scheme: &Scheme,
        message: &str,
    ) -> (String, TurnEvent) {
        let intent = intents::classify(message);
        let (reply, generated) = match intent {
            FollowUpIntent::Explanation => {
                self.generate_or_recover(scheme, &prompts::explanation_prompt(scheme))
            }
            FollowUpIntent::Documents => (documents_reply(scheme), false),
            FollowUpIntent::Benefits => (benefits_reply(scheme), false),
            FollowUpIntent::Deadline => (deadline_reply(scheme), false),
            FollowUpIntent::AgeRange => (
                format!(
                    "Eligible age range: {} to {} years.",
                    scheme.min_age, scheme.max_age
                ),
                false,
            ),
            FollowUpIntent::Apply => (apply_reply(scheme), false),
            FollowUpIntent::Eligibility => {
                self.generate_or_recover(scheme, &prompts::eligibility_prompt(scheme))
            }
            FollowUpIntent::Reasoning => self.generate_or_recover(
                scheme,
                &prompts::reasoning_prompt(scheme, &state.profile),
            ),
            FollowUpIntent::General => {
                self.generate_or_recover(scheme, &prompts::general_prompt(scheme, message))
            }
        };

        (reply, TurnEvent::Answered { intent, generated })
    }

    /// Delegate to the generation backend; on failure or empty output, answer
    /// from the scheme's stored text instead of failing the turn.
    fn generate_or_recover(&self, scheme: &Scheme, prompt: &str) -> (String, bool) {
        match self.generator.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), true),
            Ok(_) => {
                warn!(scheme = %scheme.scheme_name, "generation returned empty output, answering from stored scheme text");
                (stored_scheme_text(scheme), false)
            }
            Err(err) => {
                warn!(error = %err, scheme = %scheme.scheme_name, "text generation failed, answering from stored scheme text");
                (stored_scheme_text(scheme), false)
            }
        }
    }
}

fn render_shortlist(schemes: &[Arc<Scheme>], basis: MatchBasis) -> String {
    let mut reply = match basis {
        MatchBasis::Exact => "Here are the schemes you can access:\n".to_string(),
        MatchBasis::Fallback => {
            "No scheme matched your profile exactly. These may still be worth a look:\n".to_string()
        }
    };

    for (index, scheme) in schemes.iter().enumerate() {
        let badge = match &scheme.category {
            Some(category) => format!("{} | {}", scheme.scheme_level.label(), category),
            None => scheme.scheme_level.label().to_string(),
        };
        reply.push_str(&format!(
            "\n{}. {} ({})",
            index + 1,
            scheme.scheme_name,
            badge
        ));
    }

    reply.push_str("\n\nSelect a scheme by number or name.");
    reply
}

fn documents_reply(scheme: &Scheme) -> String {
    if scheme.documents_required.is_empty() {
        "No specific documents are listed for this scheme. Please check the official portal."
            .to_string()
    } else {
        format!(
            "The following documents are required:\n\n- {}",
            scheme.documents_required.join("\n- ")
        )
    }
}

fn benefits_reply(scheme: &Scheme) -> String {
    let benefits = scheme.benefits.trim();
    if benefits.is_empty() {
        "No benefit details are recorded for this scheme. Please check the official portal."
            .to_string()
    } else {
        benefits.to_string()
    }
}

fn deadline_reply(scheme: &Scheme) -> String {
    match scheme.deadline() {
        Deadline::NoFixedDate => {
            "This scheme has no fixed deadline. Please check the official portal.".to_string()
        }
        Deadline::Rolling => {
            "This scheme has a rolling application process. You can apply anytime.".to_string()
        }
        Deadline::Fixed(date) => format!("The last date to apply is {date}."),
    }
}

fn apply_reply(scheme: &Scheme) -> String {
    let how_to_apply = scheme.how_to_apply.trim();
    let portal = scheme
        .application_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or("Please check the official government website.");

    if how_to_apply.is_empty() {
        format!("Official portal: {portal}")
    } else {
        format!("{how_to_apply}\n\nOfficial portal: {portal}")
    }
}

fn stored_scheme_text(scheme: &Scheme) -> String {
    let description = scheme.description.trim();
    let benefits = scheme.benefits.trim();
    match (description.is_empty(), benefits.is_empty()) {
        (false, false) => format!("{description}\n\nBenefits: {benefits}"),
        (false, true) => description.to_string(),
        (true, false) => format!("Benefits: {benefits}"),
        (true, true) => {
            "No further details are recorded for this scheme. Please check the official portal."
                .to_string()
        }
    }
}

/// One processed turn: the successor state plus the reply produced for it.
#[derive(Debug, Clone)]
pub struct Turn {
    pub state: ConversationState,
    pub reply: String,
    pub event: TurnEvent,
}

/// Reply payload exposed over the conversation boundary.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub reply: String,
    pub phase: ConversationPhase,
    pub event: TurnEvent,
}

/// Structured description of what a turn did, for callers and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnEvent {
    IncompleteProfile { missing: Vec<ProfileField> },
    NoSchemesFound,
    SchemesListed { basis: MatchBasis, count: usize },
    SelectionRetry,
    SchemeSelected { scheme_name: String },
    Answered { intent: FollowUpIntent, generated: bool },
}

/// Profile snapshot returned after a field update.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub missing: Vec<ProfileField>,
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
