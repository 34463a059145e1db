//! Telegram Bot API client.
//!
//! Sends replies with `sendMessage` and downloads voice notes with
//! `getFile` followed by the file endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let config = TelegramClientConfig::new(bot_token)
//!     .with_media_dir("./data/media");
//!
//! let client = TelegramClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::media_files::{extension_or_ogg, save_media};
use crate::domain::foundation::{Channel, ChatId};
use crate::ports::{DeliveryError, MediaDownloader, MediaError, MessageSender};

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Configuration for the Telegram client.
#[derive(Debug, Clone)]
pub struct TelegramClientConfig {
    bot_token: Secret<String>,
    /// Base URL of the Bot API (default: https://api.telegram.org).
    pub api_base_url: String,
    /// Directory downloaded voice notes are written to.
    pub media_dir: PathBuf,
    /// Request timeout.
    pub timeout: Duration,
}

impl TelegramClientConfig {
    pub fn new(bot_token: Secret<String>) -> Self {
        Self {
            bot_token,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            media_dir: PathBuf::from("data/media"),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_media_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.media_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Telegram Bot API client.
pub struct TelegramClient {
    config: TelegramClientConfig,
    client: Client,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct FileInfo {
    #[serde(default)]
    file_path: Option<String>,
}

impl TelegramClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built (TLS backend unavailable).
    pub fn new(config: TelegramClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url,
            self.config.bot_token.expose_secret(),
            method
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.config.api_base_url,
            self.config.bot_token.expose_secret(),
            file_path
        )
    }

    async fn ensure_media_success(response: Response) -> Result<Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(MediaError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

// URLs embed the bot token, so errors are rendered without them.
fn redacted(err: reqwest::Error) -> String {
    err.without_url().to_string()
}

#[async_trait]
impl MessageSender for TelegramClient {
    fn channel(&self) -> Channel {
        Channel::Telegram
    }

    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: chat_id.as_str(),
                text,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::RequestFailed {
                channel: Channel::Telegram,
                reason: redacted(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                channel: Channel::Telegram,
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(chat_id = %chat_id, "Telegram message sent");
        Ok(())
    }
}

#[async_trait]
impl MediaDownloader for TelegramClient {
    async fn download_audio(&self, audio_id: &str) -> Result<PathBuf, MediaError> {
        let response = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", audio_id)])
            .send()
            .await
            .map_err(|e| MediaError::RequestFailed(redacted(e)))?;
        let response = Self::ensure_media_success(response).await?;

        let info: ApiResponse<FileInfo> = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(redacted(e)))?;
        let file_path = match info {
            ApiResponse {
                ok: true,
                result: Some(FileInfo {
                    file_path: Some(path),
                }),
                ..
            } => path,
            ApiResponse { description, .. } => {
                return Err(MediaError::InvalidResponse(
                    description.unwrap_or_else(|| "getFile returned no file_path".to_string()),
                ))
            }
        };

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| MediaError::RequestFailed(redacted(e)))?;
        let bytes = Self::ensure_media_success(response)
            .await?
            .bytes()
            .await
            .map_err(|e| MediaError::RequestFailed(redacted(e)))?;

        let path = save_media(&self.config.media_dir, extension_or_ogg(&file_path), &bytes).await?;
        tracing::info!(file_id = %audio_id, path = %path.display(), "Telegram audio downloaded");
        Ok(path)
    }
}
