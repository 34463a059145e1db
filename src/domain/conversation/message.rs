//! Inbound messages and their classification.
//!
//! Provider payloads (Telegram updates, WhatsApp notifications) are
//! parsed by their adapters and mapped to [`RawEvent`], the common shape.
//! [`classify`] turns that into the [`ClassifiedMessage`] the workflow
//! engine consumes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Channel, ChatId, UserId};

/// Text part of a raw event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

/// Audio or voice part of a raw event.
///
/// WhatsApp identifies media with `id`, Telegram with `file_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl AudioPayload {
    /// Provider media id, whichever field carries it.
    pub fn media_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.file_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Whole seconds, 0 when absent or not a positive number.
    pub fn duration_secs(&self) -> u32 {
        self.duration.map(|d| d.max(0.0) as u32).unwrap_or(0)
    }
}

/// Provider-agnostic inbound event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioPayload>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<AudioPayload>,
}

impl RawEvent {
    /// Event carrying a text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            text: Some(TextBody { body: body.into() }),
            ..Default::default()
        }
    }

    /// Event carrying an audio attachment.
    pub fn audio(id: impl Into<String>, duration: Option<f64>) -> Self {
        Self {
            audio: Some(AudioPayload {
                id: Some(id.into()),
                file_id: None,
                duration,
            }),
            ..Default::default()
        }
    }

    /// Event carrying a voice note.
    pub fn voice(file_id: impl Into<String>, duration: Option<f64>) -> Self {
        Self {
            voice: Some(AudioPayload {
                id: None,
                file_id: Some(file_id.into()),
                duration,
            }),
            ..Default::default()
        }
    }
}

/// Normalized user message. Produced per event, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifiedMessage {
    Text { body: String },
    Audio { id: String, duration_secs: u32 },
    Unsupported,
}

impl ClassifiedMessage {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    pub fn audio(id: impl Into<String>, duration_secs: u32) -> Self {
        Self::Audio {
            id: id.into(),
            duration_secs,
        }
    }

    /// Returns the body of a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { body } => Some(body),
            _ => None,
        }
    }

    /// Short label for logs and transcripts.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Audio { .. } => "audio",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Classifies a raw event.
///
/// - a text body gives `Text`;
/// - otherwise an audio or voice object with a media id gives `Audio`,
///   with the duration defaulting to 0;
/// - anything else is `Unsupported`.
pub fn classify(event: &RawEvent) -> ClassifiedMessage {
    if let Some(text) = &event.text {
        return ClassifiedMessage::text(text.body.clone());
    }

    [&event.audio, &event.voice]
        .into_iter()
        .flatten()
        .find_map(|payload| {
            payload
                .media_id()
                .map(|id| ClassifiedMessage::audio(id, payload.duration_secs()))
        })
        .unwrap_or(ClassifiedMessage::Unsupported)
}

/// A classified message together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel: Channel,
    pub chat_id: ChatId,
    pub message: ClassifiedMessage,
}

impl InboundMessage {
    pub fn new(channel: Channel, chat_id: ChatId, message: ClassifiedMessage) -> Self {
        Self {
            channel,
            chat_id,
            message,
        }
    }

    /// Key of the sender's conversation state.
    pub fn user_id(&self) -> UserId {
        UserId::for_chat(self.channel, &self.chat_id)
    }
}
