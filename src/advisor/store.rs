use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::domain::{ArchivedChat, ConversationId, ConversationState};

/// Storage abstraction for active conversations and the opaque list of past
/// chats, so the service module can be exercised in isolation.
pub trait ConversationStore: Send + Sync {
    fn create(&self) -> Result<ConversationId, StoreError>;
    fn fetch(&self, id: &ConversationId) -> Result<Option<ConversationState>, StoreError>;
    fn save(&self, id: &ConversationId, state: ConversationState) -> Result<(), StoreError>;
    fn push_archive(&self, chat: ArchivedChat) -> Result<(), StoreError>;
    fn archived(&self) -> Result<Vec<ArchivedChat>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("conversation not found")]
    NotFound,
    #[error("conversation store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store; state lives for the process lifetime only.
#[derive(Default)]
pub struct MemoryConversationStore {
    sequence: AtomicU64,
    states: Mutex<HashMap<ConversationId, ConversationState>>,
    archives: Mutex<Vec<ArchivedChat>>,
}

impl MemoryConversationStore {
    fn lock_states(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ConversationId, ConversationState>>, StoreError>
    {
        self.states
            .lock()
            .map_err(|_| StoreError::Unavailable("conversation mutex poisoned".to_string()))
    }
}

impl ConversationStore for MemoryConversationStore {
    fn create(&self) -> Result<ConversationId, StoreError> {
        let id = ConversationId(format!(
            "conv-{:06}",
            self.sequence.fetch_add(1, Ordering::Relaxed) + 1
        ));
        self.lock_states()?
            .insert(id.clone(), ConversationState::new());
        Ok(id)
    }

    fn fetch(&self, id: &ConversationId) -> Result<Option<ConversationState>, StoreError> {
        Ok(self.lock_states()?.get(id).cloned())
    }

    fn save(&self, id: &ConversationId, state: ConversationState) -> Result<(), StoreError> {
        self.lock_states()?.insert(id.clone(), state);
        Ok(())
    }

    fn push_archive(&self, chat: ArchivedChat) -> Result<(), StoreError> {
        self.archives
            .lock()
            .map_err(|_| StoreError::Unavailable("archive mutex poisoned".to_string()))?
            .push(chat);
        Ok(())
    }

    fn archived(&self) -> Result<Vec<ArchivedChat>, StoreError> {
        Ok(self
            .archives
            .lock()
            .map_err(|_| StoreError::Unavailable("archive mutex poisoned".to_string()))?
            .clone())
    }
}
