//! WhatsApp Cloud API client (Meta Graph API).
//!
//! Replies go to `POST /{phone_number_id}/messages`. Media is fetched in
//! two steps: `GET /{media_id}` returns a short-lived URL, which is then
//! downloaded with the same bearer token.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::media_files::save_media;
use crate::domain::foundation::{Channel, ChatId};
use crate::ports::{DeliveryError, MediaDownloader, MediaError, MessageSender};

/// Graph API base, pinned to the version the webhook payloads follow.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com/v20.0";

/// Configuration for the WhatsApp client.
#[derive(Debug, Clone)]
pub struct WhatsAppClientConfig {
    access_token: Secret<String>,
    /// Business phone number id messages are sent from.
    pub phone_number_id: String,
    pub graph_base_url: String,
    /// Directory downloaded audio is written to.
    pub media_dir: PathBuf,
    pub timeout: Duration,
}

impl WhatsAppClientConfig {
    pub fn new(access_token: Secret<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            access_token,
            phone_number_id: phone_number_id.into(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            media_dir: PathBuf::from("data/media"),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.graph_base_url = url.into().trim_end_matches('/').to_string();
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

/// WhatsApp Cloud API client.
pub struct WhatsAppClient {
    config: WhatsAppClientConfig,
    client: Client,
}

#[derive(Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    text: TextContent<'a>,
}

#[derive(Serialize)]
struct TextContent<'a> {
    body: &'a str,
}

#[derive(Deserialize)]
struct MediaInfo {
    url: String,
}

impl WhatsAppClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.graph_base_url, self.config.phone_number_id
        )
    }

    fn media_url(&self, media_id: &str) -> String {
        format!("{}/{}", self.config.graph_base_url, media_id)
    }

    async fn get_media(&self, url: &str) -> Result<Response, MediaError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| MediaError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    fn channel(&self) -> Channel {
        Channel::WhatsApp
    }

    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<(), DeliveryError> {
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to: chat_id.as_str(),
            text: TextContent { body: text },
        };

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::RequestFailed {
                channel: Channel::WhatsApp,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                channel: Channel::WhatsApp,
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %chat_id, "WhatsApp message sent");
        Ok(())
    }
}

#[async_trait]
impl MediaDownloader for WhatsAppClient {
    async fn download_audio(&self, audio_id: &str) -> Result<PathBuf, MediaError> {
        let info: MediaInfo = self
            .get_media(&self.media_url(audio_id))
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        let bytes = self
            .get_media(&info.url)
            .await?
            .bytes()
            .await
            .map_err(|e| MediaError::RequestFailed(e.to_string()))?;

        let path = save_media(&self.config.media_dir, "ogg", &bytes).await?;
        tracing::info!(media_id = %audio_id, path = %path.display(), "WhatsApp audio downloaded");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, media_dir: &Path) -> WhatsAppClient {
        let config = WhatsAppClientConfig::new(Secret::new("EAAG-token".to_string()), "PN123")
            .with_graph_base_url(server.uri())
            .with_media_dir(media_dir);
        WhatsAppClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn send_text_posts_to_phone_number_messages() {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("POST"))
            .and(path("/PN123/messages"))
            .and(header("authorization", "Bearer EAAG-token"))
            .and(body_json(json!({
                "messaging_product": "whatsapp",
                "to": "34600111222",
                "text": {"body": "Hola"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": [{"id": "wamid.X"}]})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, temp_dir.path())
            .send_text(&ChatId::new("34600111222").unwrap(), "Hola")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_text_reports_rejection() {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired token"))
            .mount(&server)
            .await;

        let result = client(&server, temp_dir.path())
            .send_text(&ChatId::new("1").unwrap(), "x")
            .await;

        assert!(matches!(
            result,
            Err(DeliveryError::Rejected { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn download_audio_resolves_url_then_downloads() {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/MEDIA_ID"))
            .and(header("authorization", "Bearer EAAG-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": format!("{}/download/MEDIA_ID", server.uri()),
                "mime_type": "audio/ogg"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/download/MEDIA_ID"))
            .and(header("authorization", "Bearer EAAG-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS".to_vec()))
            .mount(&server)
            .await;

        let saved = client(&server, temp_dir.path())
            .download_audio("MEDIA_ID")
            .await
            .unwrap();

        assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("ogg"));
        assert_eq!(std::fs::read(saved).unwrap(), b"OggS");
    }

    #[tokio::test]
    async fn download_audio_reports_missing_media() {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let result = client(&server, temp_dir.path()).download_audio("GONE").await;

        assert!(matches!(result, Err(MediaError::Rejected { status: 404, .. })));
    }
}
