//! Domain layer containing the dialogue logic and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `dialogue` - Dialogue definition, phases, languages and error catalog
//! - `conversation` - Per-user state, message classification and the workflow engine

pub mod conversation;
pub mod dialogue;
pub mod foundation;
