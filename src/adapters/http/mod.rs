//! HTTP adapters - webhook endpoints exposed to the chat providers.

pub mod webhook;

pub use webhook::{webhook_router, WebhookAppState};
