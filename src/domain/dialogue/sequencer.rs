//! Phase sequencing: which phase follows which, and which prompt a step shows.

use std::sync::Arc;

use super::definition::DialogueDefinition;
use super::phase::Phase;

/// Returns the phase following `current` in the fixed order.
///
/// `None` when `current` is the last phase or not a phase name at all.
pub fn next_phase(current: &str) -> Option<Phase> {
    Phase::from_name(current)?.next()
}

/// Step progression over a loaded dialogue definition.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    definition: Arc<DialogueDefinition>,
}

impl PhaseSequencer {
    pub fn new(definition: Arc<DialogueDefinition>) -> Self {
        Self { definition }
    }

    /// Returns the phase following `current`.
    pub fn next_phase(&self, current: Phase) -> Option<Phase> {
        current.next()
    }

    /// Returns the prompt for `step` of `phase` in `language`.
    ///
    /// `None` once the phase's steps are exhausted, and for unknown
    /// languages or phases.
    pub fn get_step(&self, language: &str, phase: Phase, step: usize) -> Option<&str> {
        if !phase.is_known() {
            return None;
        }
        self.definition.get_step(language, phase.name(), step)
    }

    /// Returns the definition this sequencer reads from.
    pub fn definition(&self) -> &DialogueDefinition {
        &self.definition
    }
}
