//! Response generator

use std::sync::Arc;

use parakeet_core::Message;
use parakeet_llm::ChatModel;
use parakeet_store::ConversationStore;

use crate::persona::PERSONA;
use crate::AgentError;

/// Spoken when generation fails for any reason.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble answering right now. Could you say that again?";

/// Persona-driven response generator over a persisted history.
pub struct ResponseGenerator {
    store: Arc<dyn ConversationStore>,
    model: Arc<dyn ChatModel>,
}

impl ResponseGenerator {
    pub fn new(store: Arc<dyn ConversationStore>, model: Arc<dyn ChatModel>) -> Self {
        Self { store, model }
    }

    /// Generate a reply to `user_message` within `session_id`.
    ///
    /// Never fails outward: any error during the exchange is logged and the
    /// fixed fallback reply is returned. The user message is persisted
    /// before the model call, so a failed generation can leave a user turn
    /// with no paired assistant reply; that asymmetry is accepted and not
    /// corrected.
    pub async fn generate(&self, session_id: &str, user_message: &str) -> String {
        match self.try_generate(session_id, user_message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(session_id, error = %e, "Response generation failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn try_generate(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Result<String, AgentError> {
        // History is read before the new user turn lands so it is not
        // duplicated in the prompt below.
        let history = self.store.messages(session_id).await?;
        self.store.add_user_message(session_id, user_message).await?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(PERSONA));
        messages.extend(history);
        messages.push(Message::user(user_message));

        let reply = self.model.complete(&messages).await?;
        let reply = reply.trim().to_string();

        self.store.add_assistant_message(session_id, &reply).await?;

        tracing::debug!(session_id, chars = reply.len(), "Generated assistant reply");
        Ok(reply)
    }
}
