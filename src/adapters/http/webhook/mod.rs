//! HTTP adapter for the channel webhooks.
//!
//! - `GET /health` - Liveness and enabled channels
//! - `POST /telegram/webhook` - Telegram Bot API updates
//! - `GET /whatsapp/webhook` - WhatsApp subscription handshake
//! - `POST /whatsapp/webhook` - WhatsApp Cloud API notifications

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod verifier;

pub use handlers::{
    TelegramWebhookSettings, WebhookApiError, WebhookAppState, WhatsAppWebhookSettings,
};
pub use routes::webhook_router;
