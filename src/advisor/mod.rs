//! Conversational scheme advisor: profile collection, eligibility matching,
//! scheme selection, and follow-up answering.

pub mod domain;
pub mod eligibility;
pub mod generation;
pub(crate) mod intents;
pub(crate) mod prompts;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ArchivedChat, ChatRole, ConversationId, ConversationPhase, ConversationState, ProfileError,
    ProfileField, TranscriptEntry, UserProfile,
};
pub use eligibility::{
    EligibilityEngine, MatchBasis, MatchOutcome, MatchPolicy, RuleCheck, RuleKind,
};
pub use generation::{GenerationError, TextGenerator, UnconfiguredGenerator};
pub use intents::FollowUpIntent;
pub use router::{advisor_router, recommendation_router};
pub use service::{
    AdvisorService, AdvisorServiceError, ProfileView, Turn, TurnEvent, TurnReply,
};
pub use store::{ConversationStore, MemoryConversationStore, StoreError};
