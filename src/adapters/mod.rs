//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum webhook endpoints
//! - `storage` - State and transcript stores (in-memory, files)
//! - `telegram` - Telegram Bot API
//! - `whatsapp` - WhatsApp Cloud API

pub mod http;
pub mod storage;
pub mod telegram;
pub mod whatsapp;

mod media_files;

pub use storage::{FileStateStore, FileTranscriptStore, InMemoryStateStore, InMemoryTranscriptStore};
pub use telegram::{TelegramClient, TelegramClientConfig};
pub use whatsapp::{WhatsAppClient, WhatsAppClientConfig};
