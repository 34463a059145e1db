//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `StateStore` - Per-user conversation state
//! - `TranscriptStore` - Append-only record of accepted answers
//!
//! ## Channel Ports
//!
//! - `MessageSender` - Outbound text delivery (Telegram, WhatsApp)
//! - `MediaDownloader` - Audio answer download

mod media_downloader;
mod message_sender;
mod state_store;
mod transcript_store;

pub use media_downloader::{MediaDownloader, MediaError};
pub use message_sender::{DeliveryError, MessageSender};
pub use state_store::{StateStore, StateStoreError};
pub use transcript_store::{TranscriptError, TranscriptRecord, TranscriptStore};
