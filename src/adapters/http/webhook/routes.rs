//! Axum router configuration for the webhook endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, telegram_webhook, whatsapp_verify, whatsapp_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `GET /health` - Liveness and enabled channels
/// - `POST /telegram/webhook` - Telegram updates
/// - `GET /whatsapp/webhook` - WhatsApp subscription handshake
/// - `POST /whatsapp/webhook` - WhatsApp notifications
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/telegram/webhook", post(telegram_webhook))
        .route(
            "/whatsapp/webhook",
            get(whatsapp_verify).post(whatsapp_webhook),
        )
}
