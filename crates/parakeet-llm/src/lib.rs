//! Language-model provider client for the Parakeet voice agent
//!
//! Exposes the `ChatModel` capability trait and an OpenAI-compatible HTTP
//! implementation. One non-streaming completion per call: an ordered list
//! of role-tagged messages in, one assistant message out.

pub mod client;

pub use client::{ChatModel, ChatModelConfig, HttpChatModel};

use thiserror::Error;

/// Language-model provider errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the request (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}
