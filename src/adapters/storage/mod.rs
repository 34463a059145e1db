//! Storage Adapters
//!
//! Implementations of the StateStore and TranscriptStore ports.
//!
//! ## Available Adapters
//!
//! - **FileStateStore** - One YAML file per user
//! - **InMemoryStateStore** - Stores state in memory (testing/development)
//! - **FileTranscriptStore** - One JSON array per user
//! - **InMemoryTranscriptStore** - Stores records in memory
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileStateStore, InMemoryStateStore};
//!
//! // Production: file-based storage
//! let store = FileStateStore::new("./data/state");
//!
//! // Testing: in-memory storage
//! let store = InMemoryStateStore::new();
//! ```

mod file_state_store;
mod file_transcript_store;
mod in_memory_state_store;
mod in_memory_transcript_store;

pub use file_state_store::FileStateStore;
pub use file_transcript_store::FileTranscriptStore;
pub use in_memory_state_store::InMemoryStateStore;
pub use in_memory_transcript_store::InMemoryTranscriptStore;

use crate::domain::foundation::UserId;

/// File name stem for a user: every character outside `[A-Za-z0-9_-]`
/// becomes `_`, so `telegram:123` is stored as `telegram_123`.
fn user_file_stem(user_id: &UserId) -> String {
    user_id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
