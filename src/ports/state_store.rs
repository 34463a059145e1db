//! State Store Port - Interface for persisting conversation state.
//!
//! One [`ConversationState`] per user, keyed by the channel-namespaced
//! [`UserId`]. Implementations must be safe to share across tasks.

use async_trait::async_trait;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::UserId;

/// Errors that can occur during state store operations
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("Failed to serialize state for {user_id}: {reason}")]
    SerializationFailed { user_id: UserId, reason: String },

    #[error("Failed to deserialize state for {user_id}: {reason}")]
    DeserializationFailed { user_id: UserId, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading conversation state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state of a user.
    ///
    /// # Returns
    /// `None` when the user has never been seen.
    ///
    /// # Errors
    /// Returns `StateStoreError` if the stored state cannot be read
    async fn load(&self, user_id: &UserId) -> Result<Option<ConversationState>, StateStoreError>;

    /// Save (insert or replace) the state of a user.
    ///
    /// # Errors
    /// Returns `StateStoreError` if save fails
    async fn save(&self, user_id: &UserId, state: &ConversationState)
        -> Result<(), StateStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization_error_names_user() {
        let err = StateStoreError::DeserializationFailed {
            user_id: UserId::new("telegram:9").unwrap(),
            reason: "bad yaml".to_string(),
        };
        assert!(err.to_string().contains("telegram:9"));
        assert!(err.to_string().contains("bad yaml"));
    }

    #[test]
    fn io_error_displays_message() {
        let err = StateStoreError::IoError("disk full".to_string());
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
