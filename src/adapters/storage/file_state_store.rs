//! File-based State Store Adapter
//!
//! Stores each user's conversation state as a YAML file:
//!
//! ```text
//! {base_path}/{channel}_{chat_id}.yaml
//! ```

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::UserId;
use crate::ports::{StateStore, StateStoreError};

use super::user_file_stem;

/// File-based storage for conversation state
#[derive(Debug, Clone)]
pub struct FileStateStore {
    base_path: PathBuf,
}

impl FileStateStore {
    /// Create a new file store with a base directory
    ///
    /// The directory is created on first save.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the state file path for a user
    fn state_file_path(&self, user_id: &UserId) -> PathBuf {
        self.base_path
            .join(format!("{}.yaml", user_file_stem(user_id)))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<ConversationState>, StateStoreError> {
        let yaml = match fs::read_to_string(self.state_file_path(user_id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StateStoreError::IoError(e.to_string())),
        };

        let state = serde_yaml::from_str(&yaml).map_err(|e| {
            StateStoreError::DeserializationFailed {
                user_id: user_id.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Some(state))
    }

    async fn save(
        &self,
        user_id: &UserId,
        state: &ConversationState,
    ) -> Result<(), StateStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StateStoreError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(state).map_err(|e| {
            StateStoreError::SerializationFailed {
                user_id: user_id.clone(),
                reason: e.to_string(),
            }
        })?;

        // Write to a sibling temp file first so readers never see a partial state.
        let file_path = self.state_file_path(user_id);
        let tmp_path = file_path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .await
            .map_err(|e| StateStoreError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| StateStoreError::IoError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::{Language, Phase};
    use tempfile::TempDir;

    fn user() -> UserId {
        UserId::new("telegram:42").unwrap()
    }

    #[tokio::test]
    async fn test_file_store_save_and_load_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path());
        let state = ConversationState::at(Some(Language::Ca), Phase::AudioQuestions, 1);

        store.save(&user(), &state).await.unwrap();

        assert_eq!(store.load(&user()).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_file_store_writes_yaml_named_after_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path());
        let state = ConversationState::at(Some(Language::Es), Phase::Formulaires, 3);

        store.save(&user(), &state).await.unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("telegram_42.yaml")).unwrap();
        assert!(content.contains("lang: es"));
        assert!(content.contains("phase: formulaires"));
        assert!(content.contains("step: 3"));
    }

    #[tokio::test]
    async fn test_file_store_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path().join("nested").join("state"));

        store.save(&user(), &ConversationState::new()).await.unwrap();

        assert_eq!(store.load(&user()).await.unwrap(), Some(ConversationState::new()));
    }

    #[tokio::test]
    async fn test_file_store_load_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path());

        assert_eq!(store.load(&user()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_fails_deserialization() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("telegram_42.yaml"), "step: [not, a, number]").unwrap();
        let store = FileStateStore::new(temp_dir.path());

        let result = store.load(&user()).await;

        assert!(matches!(
            result,
            Err(StateStoreError::DeserializationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_stale_phase_loads_as_unknown() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("telegram_42.yaml"),
            "lang: es\nphase: survey\nstep: 2\n",
        )
        .unwrap();
        let store = FileStateStore::new(temp_dir.path());

        let state = store.load(&user()).await.unwrap().unwrap();

        assert_eq!(state.phase, Phase::Unknown);
        assert_eq!(state.step, 2);
    }
}
