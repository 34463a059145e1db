//! File-based Transcript Store Adapter
//!
//! Keeps one pretty-printed JSON array per user:
//!
//! ```text
//! {base_path}/{channel}_{chat_id}.json
//! ```
//!
//! Appends are read-modify-write through a sibling temp file and a
//! rename; callers serialize work per user.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::UserId;
use crate::ports::{TranscriptError, TranscriptRecord, TranscriptStore};

use super::user_file_stem;

/// File-based transcript storage
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    base_path: PathBuf,
}

impl FileTranscriptStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn transcript_path(&self, user_id: &UserId) -> PathBuf {
        self.base_path
            .join(format!("{}.json", user_file_stem(user_id)))
    }

    async fn read_records(&self, path: &Path) -> Result<Vec<TranscriptRecord>, TranscriptError> {
        let json = match fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TranscriptError::IoError(e.to_string())),
        };

        serde_json::from_str(&json).map_err(|e| TranscriptError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn append(&self, record: TranscriptRecord) -> Result<(), TranscriptError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| TranscriptError::IoError(e.to_string()))?;

        let path = self.transcript_path(&record.user_id);
        let mut records = self.read_records(&path).await?;
        records.push(record);

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| TranscriptError::SerializationFailed(e.to_string()))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| TranscriptError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| TranscriptError::IoError(e.to_string()))
    }

    async fn records_for(&self, user_id: &UserId) -> Result<Vec<TranscriptRecord>, TranscriptError> {
        self.read_records(&self.transcript_path(user_id)).await
    }
}
