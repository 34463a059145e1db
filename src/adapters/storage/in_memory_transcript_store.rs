//! In-Memory Transcript Store Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::ports::{TranscriptError, TranscriptRecord, TranscriptStore};

/// In-memory transcript of accepted answers
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscriptStore {
    records: Arc<RwLock<HashMap<UserId, Vec<TranscriptRecord>>>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across users
    pub async fn record_count(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn append(&self, record: TranscriptRecord) -> Result<(), TranscriptError> {
        self.records
            .write()
            .await
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn records_for(&self, user_id: &UserId) -> Result<Vec<TranscriptRecord>, TranscriptError> {
        Ok(self
            .records
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
