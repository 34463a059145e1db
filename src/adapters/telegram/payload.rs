//! Telegram Bot API update types.
//!
//! Only the fields the dialogue needs are modelled; everything else in
//! the update is ignored.

use serde::Deserialize;

use crate::domain::conversation::{classify, AudioPayload, InboundMessage, RawEvent};
use crate::domain::foundation::{Channel, ChatId};

/// An incoming update as delivered to the webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,

    /// Absent for edited messages, callback queries, etc.
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub message_id: i64,

    pub chat: TelegramChat,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub voice: Option<TelegramMedia>,

    #[serde(default)]
    pub audio: Option<TelegramMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

/// Voice note or audio file attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMedia {
    pub file_id: String,

    /// Seconds, as sent by the client.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TelegramMedia {
    fn to_payload(&self) -> AudioPayload {
        AudioPayload {
            id: None,
            file_id: Some(self.file_id.clone()),
            duration: self.duration,
        }
    }
}

impl TelegramMessage {
    /// Maps the message to the common event shape.
    pub fn to_raw_event(&self) -> RawEvent {
        match &self.text {
            Some(text) => RawEvent::text(text.clone()),
            None => RawEvent {
                text: None,
                audio: self.audio.as_ref().map(TelegramMedia::to_payload),
                voice: self.voice.as_ref().map(TelegramMedia::to_payload),
            },
        }
    }
}

impl TelegramUpdate {
    /// Classified message of this update, `None` when the update carries
    /// no message.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let message = self.message?;
        let chat_id = ChatId::new(message.chat.id.to_string()).ok()?;
        Some(InboundMessage::new(
            Channel::Telegram,
            chat_id,
            classify(&message.to_raw_event()),
        ))
    }
}
