//! Application configuration module
//!
//! Configuration is read from environment variables with the
//! `CHATBOT_DIALOGUE` prefix; nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use chatbot_dialogue::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod channels;
mod dialogue;
mod error;
mod server;
mod storage;

pub use channels::{TelegramConfig, WhatsAppConfig};
pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialogue document location
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// State, transcript and media storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Telegram channel; absent when no bot token is configured
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,

    /// WhatsApp channel; absent when no access token is configured
    #[serde(default)]
    pub whatsapp: Option<WhatsAppConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `CHATBOT_DIALOGUE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHATBOT_DIALOGUE__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    ///
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHATBOT_DIALOGUE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// At least one channel must be configured.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.dialogue.validate()?;
        if self.telegram.is_none() && self.whatsapp.is_none() {
            return Err(ValidationError::NoChannelConfigured);
        }
        if let Some(telegram) = &self.telegram {
            telegram.validate()?;
        }
        if let Some(whatsapp) = &self.whatsapp {
            whatsapp.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
