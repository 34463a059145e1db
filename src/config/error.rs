//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Dialogue file {path} unreadable: {source}")]
    DialogueUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dialogue file {path} malformed: {source}")]
    DialogueMalformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Dialogue phases inconsistent: {0}")]
    InconsistentPhases(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddress(String),

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("No channel configured (telegram or whatsapp)")]
    NoChannelConfigured,
}
