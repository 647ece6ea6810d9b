//! Conversation history persistence for the Parakeet voice agent
//!
//! Provides the `ConversationStore` capability trait plus two
//! implementations:
//! - `SqliteConversationStore` — durable, WAL-mode SQLite behind an r2d2
//!   pool; the production store
//! - `MemoryConversationStore` — in-process map; test double and ephemeral
//!   deployments
//!
//! Histories are append-only and keyed by session id. The system persona is
//! never written here; rows carry only user and assistant turns, oldest
//! first.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::StoreError;
pub use memory::MemoryConversationStore;
pub use sqlite::{SqliteConfig, SqliteConversationStore};

use async_trait::async_trait;
use parakeet_core::Message;

/// Ordered, append-only message history keyed by session id.
///
/// Appends must be durable before the call returns: a crash immediately
/// after an append may lose the next turn, never the one just written.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Full history for a session, oldest first. Never contains the
    /// system persona. An unknown session yields an empty history.
    async fn messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError>;

    /// Append a user turn.
    async fn add_user_message(&self, session_id: &str, content: &str) -> Result<(), StoreError>;

    /// Append an assistant turn.
    async fn add_assistant_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<(), StoreError>;
}
