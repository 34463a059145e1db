//! HTTP handlers for the channel webhooks.
//!
//! These handlers authenticate a delivery, parse the provider payload and
//! pass each classified message to the application handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use secrecy::{ExposeSecret, Secret};

use crate::adapters::telegram::TelegramUpdate;
use crate::adapters::whatsapp::WhatsAppWebhook;
use crate::application::handlers::conversation::{
    HandleInboundMessageCommand, HandleInboundMessageError, HandleInboundMessageHandler,
};
use crate::domain::conversation::InboundMessage;
use crate::domain::foundation::Channel;

use super::dto::{ErrorResponse, HealthResponse, StatusResponse, VerifyQuery};
use super::verifier::{
    secrets_match, verify_hub_signature, SignatureError, TELEGRAM_SECRET_HEADER,
    WHATSAPP_SIGNATURE_HEADER,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Telegram webhook settings.
#[derive(Debug, Clone, Default)]
pub struct TelegramWebhookSettings {
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; unchecked when `None`.
    pub secret_token: Option<Secret<String>>,
}

/// WhatsApp webhook settings.
#[derive(Debug, Clone)]
pub struct WhatsAppWebhookSettings {
    /// Token echoed during the subscription handshake.
    pub verify_token: Secret<String>,
    /// App secret for `X-Hub-Signature-256`; unchecked when `None`.
    pub app_secret: Option<Secret<String>>,
}

/// Shared state of the webhook router.
///
/// A channel whose settings are `None` is not served.
#[derive(Clone)]
pub struct WebhookAppState {
    pub handler: Arc<HandleInboundMessageHandler>,
    pub telegram: Option<Arc<TelegramWebhookSettings>>,
    pub whatsapp: Option<Arc<WhatsAppWebhookSettings>>,
}

impl WebhookAppState {
    pub fn new(handler: Arc<HandleInboundMessageHandler>) -> Self {
        Self {
            handler,
            telegram: None,
            whatsapp: None,
        }
    }

    pub fn with_telegram(mut self, settings: TelegramWebhookSettings) -> Self {
        self.telegram = Some(Arc::new(settings));
        self
    }

    pub fn with_whatsapp(mut self, settings: WhatsAppWebhookSettings) -> Self {
        self.whatsapp = Some(Arc::new(settings));
        self
    }

    fn enabled_channels(&self) -> Vec<String> {
        let mut channels = Vec::new();
        if self.telegram.is_some() {
            channels.push(Channel::Telegram.to_string());
        }
        if self.whatsapp.is_some() {
            channels.push(Channel::WhatsApp.to_string());
        }
        channels
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /health`
pub async fn health(State(state): State<WebhookAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        channels: state.enabled_channels(),
    })
}

/// `POST /telegram/webhook`
pub async fn telegram_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StatusResponse>, WebhookApiError> {
    let settings = state
        .telegram
        .as_ref()
        .ok_or(WebhookApiError::ChannelNotConfigured(Channel::Telegram))?;

    if let Some(expected) = &settings.secret_token {
        let provided = header_str(&headers, TELEGRAM_SECRET_HEADER).unwrap_or_default();
        if !secrets_match(expected.expose_secret(), provided) {
            tracing::warn!("Rejected Telegram update with invalid secret token");
            return Err(WebhookApiError::Unauthorized(
                "Invalid secret token".to_string(),
            ));
        }
    }

    let update: TelegramUpdate = serde_json::from_slice(&body)
        .map_err(|e| WebhookApiError::InvalidPayload(e.to_string()))?;
    let update_id = update.update_id;

    match update.into_inbound() {
        Some(inbound) => dispatch(&state.handler, inbound).await?,
        None => tracing::debug!(update_id, "Ignoring Telegram update without message"),
    }

    Ok(Json(StatusResponse::ok()))
}

/// `GET /whatsapp/webhook` - subscription handshake.
pub async fn whatsapp_verify(
    State(state): State<WebhookAppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<String, WebhookApiError> {
    let settings = state
        .whatsapp
        .as_ref()
        .ok_or(WebhookApiError::ChannelNotConfigured(Channel::WhatsApp))?;

    let subscribing = query.mode.as_deref() == Some("subscribe");
    let token_ok = query
        .verify_token
        .as_deref()
        .is_some_and(|token| secrets_match(settings.verify_token.expose_secret(), token));

    match query.challenge {
        Some(challenge) if subscribing && token_ok => {
            tracing::info!("WhatsApp webhook subscription verified");
            Ok(challenge)
        }
        _ => {
            tracing::warn!(mode = ?query.mode, "WhatsApp webhook verification failed");
            Err(WebhookApiError::Forbidden)
        }
    }
}

/// `POST /whatsapp/webhook`
pub async fn whatsapp_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StatusResponse>, WebhookApiError> {
    let settings = state
        .whatsapp
        .as_ref()
        .ok_or(WebhookApiError::ChannelNotConfigured(Channel::WhatsApp))?;

    if let Some(app_secret) = &settings.app_secret {
        verify_hub_signature(
            app_secret.expose_secret(),
            &body,
            header_str(&headers, WHATSAPP_SIGNATURE_HEADER),
        )
        .map_err(|err| {
            tracing::warn!(error = %err, "Rejected WhatsApp notification");
            WebhookApiError::from(err)
        })?;
    }

    let notification: WhatsAppWebhook = serde_json::from_slice(&body)
        .map_err(|e| WebhookApiError::InvalidPayload(e.to_string()))?;

    let messages = notification.inbound_messages();
    if messages.is_empty() {
        tracing::debug!("Ignoring WhatsApp notification without messages");
        return Ok(Json(StatusResponse::ok()));
    }

    // Acknowledged once any message is applied; a redelivery would apply it again.
    let total = messages.len();
    let mut applied = 0;
    let mut first_error = None;
    for inbound in messages {
        let user_id = inbound.user_id();
        match dispatch(&state.handler, inbound).await {
            Ok(()) => applied += 1,
            Err(err) => {
                tracing::error!(%user_id, error = ?err, "WhatsApp message failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) if applied == 0 => Err(err),
        Some(_) => {
            tracing::warn!(applied, total, "WhatsApp batch partially applied");
            Ok(Json(StatusResponse::ok()))
        }
        None => Ok(Json(StatusResponse::ok())),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Runs one message through the application handler.
///
/// Delivery failures happen after the state is saved; they are already
/// logged and the delivery is still acknowledged, so the provider does
/// not redeliver an answer that was applied.
async fn dispatch(
    handler: &HandleInboundMessageHandler,
    inbound: InboundMessage,
) -> Result<(), WebhookApiError> {
    match handler.handle(HandleInboundMessageCommand::new(inbound)).await {
        Ok(result) => {
            tracing::debug!(
                user_id = %result.user_id,
                phase = %result.state.phase,
                step = result.state.step,
                "Inbound message handled"
            );
            Ok(())
        }
        Err(HandleInboundMessageError::Delivery(_)) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook failures to HTTP responses.
#[derive(Debug)]
pub enum WebhookApiError {
    Unauthorized(String),
    Forbidden,
    InvalidPayload(String),
    ChannelNotConfigured(Channel),
    Internal(String),
}

impl From<SignatureError> for WebhookApiError {
    fn from(err: SignatureError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

impl From<HandleInboundMessageError> for WebhookApiError {
    fn from(err: HandleInboundMessageError) -> Self {
        match err {
            HandleInboundMessageError::ChannelNotConfigured(channel) => {
                Self::ChannelNotConfigured(channel)
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE", message),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "VERIFICATION_FAILED",
                "Webhook verification failed".to_string(),
            ),
            Self::InvalidPayload(message) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", message),
            Self::ChannelNotConfigured(channel) => (
                StatusCode::NOT_FOUND,
                "CHANNEL_NOT_CONFIGURED",
                format!("Channel {} is not configured", channel),
            ),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Webhook processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
