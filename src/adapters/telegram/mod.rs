//! Telegram channel adapter: webhook update types and the Bot API client.

mod client;
mod payload;

pub use client::{TelegramClient, TelegramClientConfig, DEFAULT_API_BASE_URL};
pub use payload::{TelegramChat, TelegramMedia, TelegramMessage, TelegramUpdate};
