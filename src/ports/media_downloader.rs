//! Media Downloader Port - Fetches audio answers to local storage.

use async_trait::async_trait;
use std::path::PathBuf;

/// Errors that can occur while downloading media
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Media request failed: {0}")]
    RequestFailed(String),

    #[error("Provider rejected media request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Unexpected media response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for downloading an audio attachment by its provider media id.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download the audio identified by `audio_id`.
    ///
    /// # Returns
    /// Path of the file written under the media directory.
    async fn download_audio(&self, audio_id: &str) -> Result<PathBuf, MediaError>;
}
