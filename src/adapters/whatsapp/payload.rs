//! WhatsApp Cloud API webhook notification types.
//!
//! A notification batches messages under `entry[].changes[].value.messages[]`.
//! Status callbacks (delivered, read) arrive in the same envelope with no
//! `messages` and produce nothing.

use serde::Deserialize;

use crate::domain::conversation::{classify, AudioPayload, InboundMessage, RawEvent, TextBody};
use crate::domain::foundation::{Channel, ChatId};

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppWebhook {
    #[serde(default)]
    pub object: Option<String>,

    #[serde(default)]
    pub entry: Vec<WhatsAppEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppEntry {
    #[serde(default)]
    pub changes: Vec<WhatsAppChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppChange {
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub value: WhatsAppValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhatsAppValue {
    #[serde(default)]
    pub messages: Vec<WhatsAppMessage>,
}

/// One user message. `from` is the sender's phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppMessage {
    pub from: String,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub text: Option<TextBody>,

    #[serde(default)]
    pub audio: Option<AudioPayload>,

    #[serde(default)]
    pub voice: Option<AudioPayload>,
}

impl WhatsAppMessage {
    /// Maps the message to the common event shape.
    pub fn to_raw_event(&self) -> RawEvent {
        RawEvent {
            text: self.text.clone(),
            audio: self.audio.clone(),
            voice: self.voice.clone(),
        }
    }

    fn to_inbound(&self) -> Option<InboundMessage> {
        let chat_id = ChatId::new(self.from.clone()).ok()?;
        Some(InboundMessage::new(
            Channel::WhatsApp,
            chat_id,
            classify(&self.to_raw_event()),
        ))
    }
}

impl WhatsAppWebhook {
    /// All user messages in the notification, in delivery order.
    pub fn inbound_messages(&self) -> Vec<InboundMessage> {
        self.entry
            .iter()
            .flat_map(|entry| &entry.changes)
            .flat_map(|change| &change.value.messages)
            .filter_map(WhatsAppMessage::to_inbound)
            .collect()
    }
}
