//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where conversation state lives
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// One file per user under `data_dir`
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for state and transcript files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory downloaded audio answers are written to
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Download accepted audio answers
    #[serde(default = "default_true")]
    pub download_media: bool,

    /// Record accepted answers
    #[serde(default = "default_true")]
    pub record_transcripts: bool,
}

impl StorageConfig {
    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn transcript_dir(&self) -> PathBuf {
        self.data_dir.join("transcripts")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            media_dir: default_media_dir(),
            download_media: true,
            record_transcripts: true,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("data/media")
}

fn default_true() -> bool {
    true
}
