//! Chat completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use parakeet_core::Message;

use crate::LlmError;

/// One single-turn, non-streaming chat completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submit the full ordered message list; receive the assistant text.
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}

/// Configuration for the HTTP chat model client
#[derive(Debug, Clone)]
pub struct ChatModelConfig {
    /// Chat completion endpoint
    pub api_url: String,
    /// Bearer API key
    pub api_key: String,
    /// Model selector
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-call timeout
    pub timeout: Duration,
}

/// OpenAI-compatible chat completion client
pub struct HttpChatModel {
    config: ChatModelConfig,
    client: Client,
}

impl HttpChatModel {
    pub fn new(config: ChatModelConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .timeout(self.config.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, %body, "Chat completion failed");
            return Err(LlmError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("response has no choices".to_string()))?;

        Ok(choice.message.content)
    }
}
