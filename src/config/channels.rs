//! Chat channel configuration (Telegram, WhatsApp)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: Secret<String>,

    /// Secret token registered with `setWebhook`
    #[serde(default)]
    pub secret_token: Option<Secret<String>>,

    /// Bot API base URL
    #[serde(default = "default_telegram_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        validate_url("TELEGRAM__API_BASE_URL", &self.api_base_url)?;
        validate_timeout(self.timeout_secs)
    }
}

/// WhatsApp Cloud API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Graph API access token
    pub access_token: Secret<String>,

    /// Business phone number id replies are sent from
    pub phone_number_id: String,

    /// Token expected in the subscription handshake
    pub verify_token: Secret<String>,

    /// App secret for payload signatures
    #[serde(default)]
    pub app_secret: Option<Secret<String>>,

    /// Graph API base URL, including the version
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl WhatsAppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate WhatsApp configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("WHATSAPP__ACCESS_TOKEN"));
        }
        if self.phone_number_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("WHATSAPP__PHONE_NUMBER_ID"));
        }
        if self.verify_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("WHATSAPP__VERIFY_TOKEN"));
        }
        validate_url("WHATSAPP__GRAPH_BASE_URL", &self.graph_base_url)?;
        validate_timeout(self.timeout_secs)
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

fn validate_timeout(timeout_secs: u64) -> Result<(), ValidationError> {
    if timeout_secs == 0 || timeout_secs > 300 {
        return Err(ValidationError::InvalidTimeout);
    }
    Ok(())
}

fn default_telegram_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com/v20.0".to_string()
}

fn default_timeout() -> u64 {
    15
}
