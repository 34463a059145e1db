//! Message Sender Port - Outbound text delivery to a chat channel.

use async_trait::async_trait;

use crate::domain::foundation::{Channel, ChatId};

/// Errors returned by channel clients when a message cannot be delivered
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Request to {channel} failed: {reason}")]
    RequestFailed { channel: Channel, reason: String },

    #[error("{channel} rejected the message ({status}): {body}")]
    Rejected {
        channel: Channel,
        status: u16,
        body: String,
    },
}

/// Port for sending text replies to a user
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Channel this sender delivers to.
    fn channel(&self) -> Channel;

    /// Send a plain text message to a chat.
    ///
    /// # Errors
    /// Returns `DeliveryError` if the provider cannot be reached or
    /// answers with a non-success status
    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<(), DeliveryError>;
}
