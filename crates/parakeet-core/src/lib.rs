//! Core types for the Parakeet voice agent
//!
//! This crate provides foundational types used across all other crates:
//! - Role-tagged conversation messages
//! - Voice rendering parameters

pub mod message;
pub mod voice;

pub use message::{Message, Role};
pub use voice::VoiceSettings;
