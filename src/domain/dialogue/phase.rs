//! Dialogue phases and their fixed ordering.
//!
//! The order is part of the dialogue type, not of the loaded document:
//! a questionnaire always runs presentation → formulaires →
//! audio_questions → conclusion, and returns to presentation only by
//! clearing the conversation state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The fixed phase order.
pub const PHASE_ORDER: [Phase; 4] = [
    Phase::Presentation,
    Phase::Formulaires,
    Phase::AudioQuestions,
    Phase::Conclusion,
];

/// A named stage of the conversation with its own step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Greeting and language selection.
    #[default]
    Presentation,

    /// Numeric questionnaire, answers in 0..=4.
    Formulaires,

    /// Spoken answers, each at least 20 seconds long.
    AudioQuestions,

    /// Closing message; any input resets the conversation.
    Conclusion,

    /// A phase name outside the fixed order, e.g. from a stale store.
    #[serde(other)]
    Unknown,
}

impl Phase {
    /// Returns the name keying this phase in the dialogue document.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Formulaires => "formulaires",
            Self::AudioQuestions => "audio_questions",
            Self::Conclusion => "conclusion",
            Self::Unknown => "unknown",
        }
    }

    /// Looks up a phase by document name. Only the four ordered phases match.
    pub fn from_name(name: &str) -> Option<Self> {
        PHASE_ORDER.into_iter().find(|phase| phase.name() == name)
    }

    /// Returns true if this phase is part of the fixed order.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the following phase, or `None` for the last or an unknown phase.
    pub fn next(&self) -> Option<Self> {
        let index = PHASE_ORDER.iter().position(|phase| phase == self)?;
        PHASE_ORDER.get(index + 1).copied()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl StateMachine for Phase {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Presentation => vec![Self::Formulaires],
            Self::Formulaires => vec![Self::AudioQuestions],
            Self::AudioQuestions => vec![Self::Conclusion],
            // Reached only through the state reset.
            Self::Conclusion => vec![Self::Presentation],
            Self::Unknown => vec![],
        }
    }
}
