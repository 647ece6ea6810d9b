//! Configuration for the Parakeet voice agent
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `PARAKEET__…` environment variables. Provider credentials may also
//! come from the conventional `GROQ_API_KEY` / `ELEVENLABS_API_KEY` /
//! `ELEVENLABS_VOICE_ID` variables. `Settings::validate` fails fast on a
//! missing credential so a bad deployment dies at startup instead of at the
//! first provider call.

pub mod settings;

pub use settings::{
    LlmConfig, LogConfig, PipelineConfig, PipelineVariant, ServerConfig, Settings, StoreConfig,
    SttConfig, TtsConfig,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required value for {field} (set {hint})")]
    MissingValue { field: String, hint: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
