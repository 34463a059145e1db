//! Checked transitions for enums with a fixed successor graph.
//!
//! The dialogue phases implement this; the workflow engine moves between
//! phases only through [`StateMachine::transition_to`].

use std::fmt::Display;

use super::{DomainError, ErrorCode};

/// An enum whose values may only move along declared edges.
pub trait StateMachine: Sized + Copy + PartialEq + Display {
    /// Targets reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` when the edge exists.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition`, with `from` and `to` details.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("{} cannot move to {}", self, target),
        )
        .with_detail("from", self.to_string())
        .with_detail("to", target.to_string()))
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
