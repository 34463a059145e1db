//! Transcript Store Port - Append-only record of accepted answers.
//!
//! Each accepted answer is stored with the position in the dialogue it
//! answered, so a questionnaire can be reconstructed after the
//! conversation state itself has been reset.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::dialogue::Phase;
use crate::domain::foundation::{Timestamp, UserId};

/// One accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub user_id: UserId,
    pub phase: Phase,
    pub step: usize,
    /// Text answer, or the media id for audio answers.
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    pub recorded_at: Timestamp,
}

impl TranscriptRecord {
    pub fn new(user_id: UserId, phase: Phase, step: usize, response: impl Into<String>) -> Self {
        Self {
            user_id,
            phase,
            step,
            response: response.into(),
            audio_path: None,
            recorded_at: Timestamp::now(),
        }
    }

    pub fn with_audio_path(mut self, path: impl Into<String>) -> Self {
        self.audio_path = Some(path.into());
        self
    }
}

/// Errors that can occur during transcript operations
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Failed to serialize transcript: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize transcript: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for recording answers
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Append a record to the user's transcript.
    async fn append(&self, record: TranscriptRecord) -> Result<(), TranscriptError>;

    /// All records of a user, oldest first. Unknown users have none.
    async fn records_for(&self, user_id: &UserId) -> Result<Vec<TranscriptRecord>, TranscriptError>;
}
