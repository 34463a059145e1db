//! Dialogue module.
//!
//! Static description of the questionnaire: languages, the fixed phase
//! order, per-phase step prompts and localized error messages.

mod definition;
mod error_catalog;
mod language;
mod phase;
mod sequencer;

pub use definition::{DialogueDefinition, DialogueDocument, PhaseSetMismatch, Step};
pub use error_catalog::{ErrorCatalog, ErrorKind, FALLBACK_UNKNOWN_STATE};
pub use language::{Language, DEFAULT_LANGUAGE_CODE};
pub use phase::{Phase, PHASE_ORDER};
pub use sequencer::{next_phase, PhaseSequencer};
