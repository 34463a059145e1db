//! Localized messages for recoverable dialogue errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::language::DEFAULT_LANGUAGE_CODE;

/// Shown when neither the requested message nor the default-language
/// `UNKNOWN_STATE` entry exists in the catalog.
pub const FALLBACK_UNKNOWN_STATE: &str =
    "Ha ocurrido un error inesperado. Por favor, inténtalo de nuevo.";

/// A category of invalid input, reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Presentation answer is not a recognized language token.
    LangNotSupported,
    /// Formulaires answer is not an integer in 0..=4.
    InvalidNumber,
    /// Audio question answered with something other than audio.
    NotAudio,
    /// Audio answer shorter than the minimum duration.
    AudioTooShort,
    /// Missing prompt or a phase outside the fixed order.
    UnknownState,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::LangNotSupported,
        ErrorKind::InvalidNumber,
        ErrorKind::NotAudio,
        ErrorKind::AudioTooShort,
        ErrorKind::UnknownState,
    ];

    /// Key of this kind in the `ERRORS` section of the dialogue document.
    pub fn key(&self) -> &'static str {
        match self {
            Self::LangNotSupported => "LANG_NOT_SUPPORTED",
            Self::InvalidNumber => "INVALID_NUMBER",
            Self::NotAudio => "NOT_AUDIO",
            Self::AudioTooShort => "AUDIO_TOO_SHORT",
            Self::UnknownState => "UNKNOWN_STATE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Mapping language → error key → message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCatalog {
    messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl ErrorCatalog {
    pub fn new(messages: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { messages }
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.messages.get(language)?.get(key).map(String::as_str)
    }

    /// Returns the localized message for `kind`.
    ///
    /// Never fails: a missing entry falls back to the default-language
    /// `UNKNOWN_STATE` message, then to [`FALLBACK_UNKNOWN_STATE`].
    pub fn message(&self, language: &str, kind: ErrorKind) -> &str {
        self.lookup(language, kind.key())
            .or_else(|| self.lookup(DEFAULT_LANGUAGE_CODE, ErrorKind::UnknownState.key()))
            .unwrap_or(FALLBACK_UNKNOWN_STATE)
    }

    /// Kinds without a message for `language`.
    pub fn missing_kinds(&self, language: &str) -> Vec<ErrorKind> {
        ErrorKind::ALL
            .into_iter()
            .filter(|kind| self.lookup(language, kind.key()).is_none())
            .collect()
    }
}
