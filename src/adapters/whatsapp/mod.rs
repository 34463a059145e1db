//! WhatsApp channel adapter: Cloud API notification types and client.

mod client;
mod payload;

pub use client::{WhatsAppClient, WhatsAppClientConfig, DEFAULT_GRAPH_BASE_URL};
pub use payload::{WhatsAppChange, WhatsAppEntry, WhatsAppMessage, WhatsAppValue, WhatsAppWebhook};
