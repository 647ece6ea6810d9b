//! In-memory conversation store
//!
//! Same contract as the SQLite store minus durability. Used as a test
//! double and for ephemeral deployments that do not need history to outlive
//! the process.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use parakeet_core::{Message, Role};

use crate::{ConversationStore, StoreError};

/// In-process map-backed store
#[derive(Default)]
pub struct MemoryConversationStore {
    sessions: Mutex<HashMap<String, Vec<Message>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&self, session_id: &str, role: Role, content: &str) {
        self.sessions
            .lock()
            .entry(session_id.to_string())
            .or_default()
            .push(Message {
                role,
                content: content.to_string(),
            });
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_user_message(&self, session_id: &str, content: &str) -> Result<(), StoreError> {
        self.append(session_id, Role::User, content);
        Ok(())
    }

    async fn add_assistant_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        self.append(session_id, Role::Assistant, content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_order() {
        let store = MemoryConversationStore::new();
        store.add_user_message("s1", "a").await.unwrap();
        store.add_assistant_message("s1", "b").await.unwrap();

        let messages = store.messages("s1").await.unwrap();
        assert_eq!(messages, vec![Message::user("a"), Message::assistant("b")]);
        assert!(store.messages("s2").await.unwrap().is_empty());
    }
}
