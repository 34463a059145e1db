//! Conversation module.
//!
//! Per-user state, inbound message classification and the workflow
//! engine that moves a conversation through the dialogue phases.

mod engine;
mod message;
mod state;

pub use engine::{
    parse_form_answer, Transition, TransitionOutcome, WorkflowEngine, MAX_FORM_ANSWER,
    MIN_AUDIO_SECONDS,
};
pub use message::{classify, AudioPayload, ClassifiedMessage, InboundMessage, RawEvent, TextBody};
pub use state::ConversationState;
