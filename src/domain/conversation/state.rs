//! Per-user conversation state.

use serde::{Deserialize, Serialize};

use crate::domain::dialogue::{Language, Phase, DEFAULT_LANGUAGE_CODE};

/// The minimal per-user context needed to resume a dialogue.
///
/// The default value is the pristine state: no language chosen, first
/// phase, first step. Completing the conclusion phase returns a user to
/// exactly this value.
///
/// Serialized as `{"lang": "es", "phase": "formulaires", "step": 2}`; an
/// unset language is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(rename = "lang", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    #[serde(default)]
    pub phase: Phase,

    #[serde(default)]
    pub step: usize,
}

impl ConversationState {
    /// Creates the pristine state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state at a given position.
    pub fn at(language: Option<Language>, phase: Phase, step: usize) -> Self {
        Self {
            language,
            phase,
            step,
        }
    }

    /// Code used for prompt and error lookups, `es` until a language is chosen.
    pub fn language_code(&self) -> &'static str {
        self.language
            .map(|language| language.code())
            .unwrap_or(DEFAULT_LANGUAGE_CODE)
    }

    /// Returns true for the pristine (cleared) state.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
