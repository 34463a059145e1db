//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types and the state machine
//! trait that form the vocabulary of the dialogue domain.

mod ids;
mod timestamp;
mod state_machine;
mod errors;

pub use ids::{Channel, ChatId, UserId};
pub use timestamp::Timestamp;
pub use state_machine::StateMachine;
pub use errors::{DomainError, ErrorCode, ValidationError};
