//! Domain error types.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A value object rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Machine-readable category of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    /// A state machine was asked to follow an undeclared edge.
    InvalidStateTransition,
    /// Languages of a dialogue document define different phases.
    InconsistentPhases,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            Self::InconsistentPhases => "INCONSISTENT_PHASES",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain rule violation with a code, a message and ordered details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_the_field() {
        assert_eq!(
            ValidationError::empty_field("user_id").to_string(),
            "Field 'user_id' cannot be empty"
        );
        assert_eq!(
            ValidationError::invalid_format("user_id", "missing channel prefix").to_string(),
            "Field 'user_id' has invalid format: missing channel prefix"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::InconsistentPhases, "ca is missing conclusion");
        assert_eq!(err.to_string(), "[INCONSISTENT_PHASES] ca is missing conclusion");
    }

    #[test]
    fn details_are_kept_in_key_order() {
        let err = DomainError::new(ErrorCode::InvalidStateTransition, "no edge")
            .with_detail("to", "conclusion")
            .with_detail("from", "presentation");
        let keys: Vec<&str> = err.details.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["from", "to"]);
    }

    #[test]
    fn validation_error_converts_to_validation_failed() {
        let err: DomainError = ValidationError::empty_field("chat_id").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("chat_id"));
    }
}
