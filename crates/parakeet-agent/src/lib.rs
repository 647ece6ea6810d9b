//! Response generation for the Parakeet voice agent
//!
//! Combines the fixed persona, the persisted conversation history, and the
//! new user message into one chat completion, persisting both sides of the
//! exchange. Generation never fails outward: any store or provider error
//! degrades to a fixed spoken fallback.

pub mod generator;
pub mod persona;

pub use generator::{ResponseGenerator, FALLBACK_REPLY};
pub use persona::PERSONA;

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Store error: {0}")]
    Store(#[from] parakeet_store::StoreError),

    #[error("Model error: {0}")]
    Model(#[from] parakeet_llm::LlmError),
}
