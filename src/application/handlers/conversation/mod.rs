//! Conversation command handlers.
//!
//! Handles inbound chat messages from every channel.

mod handle_inbound_message;
mod user_locks;

pub use handle_inbound_message::{
    HandleInboundMessageCommand, HandleInboundMessageError, HandleInboundMessageHandler,
    HandleInboundMessageResult, InboundDisposition,
};
pub use user_locks::UserLocks;
