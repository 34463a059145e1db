//! Command handlers for the application layer.

pub mod conversation;

pub use conversation::{
    HandleInboundMessageCommand, HandleInboundMessageError, HandleInboundMessageHandler,
    HandleInboundMessageResult, InboundDisposition, UserLocks,
};
