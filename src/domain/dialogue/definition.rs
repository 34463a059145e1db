//! Dialogue definition: the per-language prompts of every phase.
//!
//! The source is a YAML document with two top-level sections:
//!
//! ```yaml
//! QUESTIONS:
//!   es:
//!     presentation:
//!       - text: "Hola! ..."
//!     formulaires:
//!       - question: "Del 0 al 4, ..."
//! ERRORS:
//!   es:
//!     INVALID_NUMBER: "Responde con un número del 0 al 4."
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::{DomainError, ErrorCode};

use super::error_catalog::ErrorCatalog;

/// One indexed unit of phase content.
///
/// A step is either informational (`text`) or a prompt expecting an
/// answer (`question`). Its index is its position in the phase sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl Step {
    /// Creates an informational step.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            question: None,
        }
    }

    /// Creates a question step.
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            text: None,
            question: Some(question.into()),
        }
    }

    /// Returns the text shown to the user: `text` wins over `question`.
    pub fn prompt(&self) -> Option<&str> {
        self.text.as_deref().or(self.question.as_deref())
    }
}

/// Raw shape of the dialogue document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogueDocument {
    #[serde(rename = "QUESTIONS", default)]
    pub questions: BTreeMap<String, BTreeMap<String, Vec<Step>>>,

    #[serde(rename = "ERRORS", default)]
    pub errors: BTreeMap<String, BTreeMap<String, String>>,
}

impl DialogueDocument {
    /// Parses a YAML dialogue document.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document is not valid YAML or does
    /// not match the expected shape.
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// Splits the document into its prompt and error sections.
    pub fn into_parts(self) -> (DialogueDefinition, ErrorCatalog) {
        (
            DialogueDefinition::new(self.questions),
            ErrorCatalog::new(self.errors),
        )
    }
}

/// A language whose phase set differs from the union of all phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSetMismatch {
    pub language: String,
    pub missing_phases: Vec<String>,
}

/// Mapping language → phase name → ordered steps. Immutable after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueDefinition {
    questions: BTreeMap<String, BTreeMap<String, Vec<Step>>>,
}

impl DialogueDefinition {
    /// Wraps an already-parsed question map.
    pub fn new(questions: BTreeMap<String, BTreeMap<String, Vec<Step>>>) -> Self {
        Self { questions }
    }

    /// Returns the steps of a phase, if the language defines it.
    pub fn steps(&self, language: &str, phase: &str) -> Option<&[Step]> {
        self.questions
            .get(language)?
            .get(phase)
            .map(Vec::as_slice)
    }

    /// Returns the prompt at `index`, or `None` past the end of the
    /// sequence, for an unknown language or phase, or for an empty step.
    pub fn get_step(&self, language: &str, phase: &str, index: usize) -> Option<&str> {
        self.steps(language, phase)?.get(index)?.prompt()
    }

    /// Languages present in the document.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.questions.keys().map(String::as_str)
    }

    /// Lists languages missing phases that some other language defines.
    pub fn phase_set_mismatches(&self) -> Vec<PhaseSetMismatch> {
        let all_phases: BTreeSet<&str> = self
            .questions
            .values()
            .flat_map(|phases| phases.keys().map(String::as_str))
            .collect();

        self.questions
            .iter()
            .filter_map(|(language, phases)| {
                let missing: Vec<String> = all_phases
                    .iter()
                    .filter(|phase| !phases.contains_key(**phase))
                    .map(|phase| phase.to_string())
                    .collect();
                (!missing.is_empty()).then(|| PhaseSetMismatch {
                    language: language.clone(),
                    missing_phases: missing,
                })
            })
            .collect()
    }

    /// Fails if any language does not define the same phases as the others.
    pub fn check_phase_sets(&self) -> Result<(), DomainError> {
        let mismatches = self.phase_set_mismatches();
        if mismatches.is_empty() {
            return Ok(());
        }

        let summary = mismatches
            .iter()
            .map(|m| format!("{} lacks {}", m.language, m.missing_phases.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        Err(DomainError::new(ErrorCode::InconsistentPhases, summary))
    }
}
