//! Dialogue document configuration and loading

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::conversation::WorkflowEngine;
use crate::domain::dialogue::{DialogueDefinition, DialogueDocument, ErrorCatalog};

use super::error::{ConfigError, ValidationError};

/// Where the dialogue document lives and how strictly it is checked
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Path of the YAML dialogue document
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Refuse to start when languages define different phase sets
    #[serde(default)]
    pub strict_phases: bool,
}

impl DialogueConfig {
    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("DIALOGUE__PATH"));
        }
        Ok(())
    }

    /// Reads and parses the dialogue document.
    ///
    /// # Errors
    ///
    /// `DialogueUnreadable` if the file cannot be read, `DialogueMalformed`
    /// if it is not a valid dialogue document.
    pub fn load_document(&self) -> Result<DialogueDocument, ConfigError> {
        let source =
            std::fs::read_to_string(&self.path).map_err(|source| ConfigError::DialogueUnreadable {
                path: self.path.clone(),
                source,
            })?;

        DialogueDocument::from_yaml_str(&source).map_err(|source| ConfigError::DialogueMalformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads the document and builds the workflow engine.
    ///
    /// Phase-set mismatches between languages are logged, or rejected
    /// with `InconsistentPhases` when `strict_phases` is set.
    pub fn load_engine(&self) -> Result<WorkflowEngine, ConfigError> {
        let (definition, errors) = self.load_document()?.into_parts();
        self.check(&definition, &errors)?;

        tracing::info!(
            path = %self.path.display(),
            languages = ?definition.languages().collect::<Vec<_>>(),
            "Dialogue loaded"
        );
        Ok(WorkflowEngine::new(Arc::new(definition), Arc::new(errors)))
    }

    fn check(&self, definition: &DialogueDefinition, errors: &ErrorCatalog) -> Result<(), ConfigError> {
        if self.strict_phases {
            definition
                .check_phase_sets()
                .map_err(|err| ConfigError::InconsistentPhases(err.message))?;
        } else {
            for mismatch in definition.phase_set_mismatches() {
                tracing::warn!(
                    language = %mismatch.language,
                    missing = ?mismatch.missing_phases,
                    "Dialogue language does not define every phase"
                );
            }
        }

        for language in definition.languages() {
            let missing = errors.missing_kinds(language);
            if !missing.is_empty() {
                tracing::warn!(
                    language,
                    missing = ?missing,
                    "Error messages missing, falling back to the default"
                );
            }
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            strict_phases: false,
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("config/workflow.yaml")
}
