//! HandleInboundMessageHandler - use case for one inbound chat message.
//!
//! For each message: serialize on the user, load the stored state, run
//! the workflow engine, persist the new state, record accepted answers,
//! download accepted audio and deliver the response.
//!
//! A user with no stored state is greeted with the first presentation
//! step and stored in the pristine state; that first message is not
//! processed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::{
    ClassifiedMessage, ConversationState, InboundMessage, TransitionOutcome, WorkflowEngine,
};
use crate::domain::foundation::{Channel, UserId};
use crate::ports::{
    DeliveryError, MediaDownloader, MessageSender, StateStore, StateStoreError, TranscriptRecord,
    TranscriptStore,
};

use super::user_locks::UserLocks;

/// Command carrying one classified inbound message.
#[derive(Debug, Clone)]
pub struct HandleInboundMessageCommand {
    pub inbound: InboundMessage,
}

impl HandleInboundMessageCommand {
    pub fn new(inbound: InboundMessage) -> Self {
        Self { inbound }
    }
}

/// What happened to the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundDisposition {
    /// First contact: greeted, message not processed.
    Greeted,
    /// Processed by the workflow engine.
    Processed(TransitionOutcome),
}

/// Result of handling an inbound message.
#[derive(Debug, Clone)]
pub struct HandleInboundMessageResult {
    pub user_id: UserId,
    pub state: ConversationState,
    pub response: String,
    pub disposition: InboundDisposition,
    pub audio_path: Option<PathBuf>,
}

/// Errors that can occur when handling an inbound message.
#[derive(Debug, Error)]
pub enum HandleInboundMessageError {
    #[error("No sender configured for channel {0}")]
    ChannelNotConfigured(Channel),

    #[error("State store error: {0}")]
    StateStore(#[from] StateStoreError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Handler for inbound messages from every configured channel.
pub struct HandleInboundMessageHandler {
    engine: Arc<WorkflowEngine>,
    state_store: Arc<dyn StateStore>,
    transcripts: Option<Arc<dyn TranscriptStore>>,
    senders: HashMap<Channel, Arc<dyn MessageSender>>,
    downloaders: HashMap<Channel, Arc<dyn MediaDownloader>>,
    locks: UserLocks,
}

impl HandleInboundMessageHandler {
    pub fn new(engine: Arc<WorkflowEngine>, state_store: Arc<dyn StateStore>) -> Self {
        Self {
            engine,
            state_store,
            transcripts: None,
            senders: HashMap::new(),
            downloaders: HashMap::new(),
            locks: UserLocks::new(),
        }
    }

    /// Registers the sender for its channel, replacing any previous one.
    pub fn with_sender(mut self, sender: Arc<dyn MessageSender>) -> Self {
        self.senders.insert(sender.channel(), sender);
        self
    }

    /// Registers the audio downloader of a channel.
    pub fn with_downloader(mut self, channel: Channel, downloader: Arc<dyn MediaDownloader>) -> Self {
        self.downloaders.insert(channel, downloader);
        self
    }

    pub fn with_transcripts(mut self, transcripts: Arc<dyn TranscriptStore>) -> Self {
        self.transcripts = Some(transcripts);
        self
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// Returns true when replies can be delivered on the channel.
    pub fn serves(&self, channel: Channel) -> bool {
        self.senders.contains_key(&channel)
    }

    pub async fn handle(
        &self,
        cmd: HandleInboundMessageCommand,
    ) -> Result<HandleInboundMessageResult, HandleInboundMessageError> {
        let inbound = cmd.inbound;
        let user_id = inbound.user_id();
        let sender = self
            .senders
            .get(&inbound.channel)
            .cloned()
            .ok_or(HandleInboundMessageError::ChannelNotConfigured(inbound.channel))?;

        let _guard = self.locks.acquire(&user_id).await;

        let Some(state) = self.state_store.load(&user_id).await? else {
            let state = ConversationState::default();
            self.state_store.save(&user_id, &state).await?;
            let response = self.engine.greeting().to_string();
            tracing::info!(user_id = %user_id, "New conversation started");

            self.deliver(sender.as_ref(), &inbound, &response).await?;
            return Ok(HandleInboundMessageResult {
                user_id,
                state,
                response,
                disposition: InboundDisposition::Greeted,
                audio_path: None,
            });
        };

        let previous = state.clone();
        let transition = self.engine.process(&user_id, &inbound.message, state);
        self.state_store.save(&user_id, &transition.state).await?;

        let audio_path = match &transition.outcome {
            TransitionOutcome::AudioAccepted { audio_id } => {
                self.download_audio(inbound.channel, &user_id, audio_id).await
            }
            _ => None,
        };

        self.record_answer(&user_id, &previous, &inbound.message, &transition.outcome, audio_path.as_ref())
            .await;

        self.deliver(sender.as_ref(), &inbound, &transition.response)
            .await?;

        Ok(HandleInboundMessageResult {
            user_id,
            state: transition.state,
            response: transition.response,
            disposition: InboundDisposition::Processed(transition.outcome),
            audio_path,
        })
    }

    async fn deliver(
        &self,
        sender: &dyn MessageSender,
        inbound: &InboundMessage,
        text: &str,
    ) -> Result<(), DeliveryError> {
        sender
            .send_text(&inbound.chat_id, text)
            .await
            .map_err(|err| {
                tracing::warn!(
                    channel = %inbound.channel,
                    chat_id = %inbound.chat_id,
                    error = %err,
                    "Failed to deliver response"
                );
                err
            })
    }

    async fn download_audio(
        &self,
        channel: Channel,
        user_id: &UserId,
        audio_id: &str,
    ) -> Option<PathBuf> {
        let downloader = self.downloaders.get(&channel)?;
        match downloader.download_audio(audio_id).await {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(
                    user_id = %user_id,
                    audio_id = %audio_id,
                    error = %err,
                    "Failed to download audio answer"
                );
                None
            }
        }
    }

    /// Appends accepted answers to the transcript. Failures are logged only.
    async fn record_answer(
        &self,
        user_id: &UserId,
        answered: &ConversationState,
        message: &ClassifiedMessage,
        outcome: &TransitionOutcome,
        audio_path: Option<&PathBuf>,
    ) {
        let Some(transcripts) = &self.transcripts else {
            return;
        };

        let response = match (outcome, message) {
            (TransitionOutcome::Accepted, ClassifiedMessage::Text { body }) => body.trim().to_string(),
            (TransitionOutcome::AudioAccepted { audio_id }, _) => audio_id.clone(),
            _ => return,
        };

        let mut record = TranscriptRecord::new(user_id.clone(), answered.phase, answered.step, response);
        if let Some(path) = audio_path {
            record = record.with_audio_path(path.display().to_string());
        }

        if let Err(err) = transcripts.append(record).await {
            tracing::warn!(user_id = %user_id, error = %err, "Failed to record answer");
        }
    }
}
