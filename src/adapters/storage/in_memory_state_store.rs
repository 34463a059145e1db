//! In-Memory State Store Adapter
//!
//! Keeps conversation state in a map. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::UserId;
use crate::ports::{StateStore, StateStoreError};

/// In-memory storage for conversation state
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<UserId, ConversationState>>>,
}

impl InMemoryStateStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.states.write().await.clear();
    }

    /// Get the number of stored states
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<ConversationState>, StateStoreError> {
        Ok(self.states.read().await.get(user_id).cloned())
    }

    async fn save(
        &self,
        user_id: &UserId,
        state: &ConversationState,
    ) -> Result<(), StateStoreError> {
        self.states
            .write()
            .await
            .insert(user_id.clone(), state.clone());
        Ok(())
    }
}
