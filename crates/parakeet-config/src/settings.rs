//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use parakeet_core::VoiceSettings;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Transcription provider configuration
    #[serde(default)]
    pub stt: SttConfig,

    /// Language-model provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Synthesis provider configuration
    #[serde(default)]
    pub tts: TtsConfig,

    /// Conversation store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Turn pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Settings {
    /// Load settings from an optional TOML file layered under
    /// `PARAKEET__…` environment variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("PARAKEET")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.apply_env_fallbacks();
        Ok(settings)
    }

    /// Honor the conventional provider environment variables when the
    /// prefixed form was not given.
    fn apply_env_fallbacks(&mut self) {
        if self.stt.api_key.is_empty() {
            if let Ok(key) = std::env::var("GROQ_API_KEY") {
                self.stt.api_key = key;
            }
        }
        if self.llm.api_key.is_empty() {
            if let Ok(key) = std::env::var("GROQ_API_KEY") {
                self.llm.api_key = key;
            }
        }
        if self.tts.api_key.is_empty() {
            if let Ok(key) = std::env::var("ELEVENLABS_API_KEY") {
                self.tts.api_key = key;
            }
        }
        if self.tts.voice_id.is_empty() {
            if let Ok(id) = std::env::var("ELEVENLABS_VOICE_ID") {
                self.tts.voice_id = id;
            }
        }
    }

    /// Validate settings, failing fast on missing provider credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("stt.api_key", &self.stt.api_key, "GROQ_API_KEY"),
            ("llm.api_key", &self.llm.api_key, "GROQ_API_KEY"),
            ("tts.api_key", &self.tts.api_key, "ELEVENLABS_API_KEY"),
            ("tts.voice_id", &self.tts.voice_id, "ELEVENLABS_VOICE_ID"),
        ];

        for (field, value, hint) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingValue {
                    field: field.to_string(),
                    hint: hint.to_string(),
                });
            }
        }

        if self.pipeline.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.request_timeout_secs".to_string(),
                message: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WebSocket path
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_ws_path() -> String {
    "/ws/audio".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ws_path: default_ws_path(),
        }
    }
}

/// Transcription provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// API key (falls back to GROQ_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Transcription endpoint
    #[serde(default = "default_stt_url")]
    pub api_url: String,

    /// Model selector
    #[serde(default = "default_stt_model")]
    pub model: String,
}

fn default_stt_url() -> String {
    "https://api.groq.com/openai/v1/audio/transcriptions".to_string()
}

fn default_stt_model() -> String {
    "whisper-large-v3".to_string()
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_stt_url(),
            model: default_stt_model(),
        }
    }
}

/// Language-model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (falls back to GROQ_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Chat completion endpoint
    #[serde(default = "default_llm_url")]
    pub api_url: String,

    /// Model selector
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_llm_url(),
            model: default_llm_model(),
            temperature: default_temperature(),
        }
    }
}

/// Synthesis provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// API key (falls back to ELEVENLABS_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Synthesis endpoint base; the voice id is appended per call
    #[serde(default = "default_tts_url")]
    pub api_url: String,

    /// Voice identifier (falls back to ELEVENLABS_VOICE_ID)
    #[serde(default)]
    pub voice_id: String,

    /// Model selector
    #[serde(default = "default_tts_model")]
    pub model: String,

    /// Output format selector
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Voice rendering parameters
    #[serde(default)]
    pub voice: VoiceSettings,
}

fn default_tts_url() -> String {
    "https://api.elevenlabs.io/v1/text-to-speech".to_string()
}

fn default_tts_model() -> String {
    "eleven_flash_v2_5".to_string()
}

fn default_output_format() -> String {
    "mp3_22050_32".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_tts_url(),
            voice_id: String::new(),
            model: default_tts_model(),
            output_format: default_output_format(),
            voice: VoiceSettings::default(),
        }
    }
}

/// Conversation store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

fn default_store_path() -> String {
    "parakeet.db".to_string()
}

fn default_busy_timeout() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            busy_timeout_ms: default_busy_timeout(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

/// Turn pipeline variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineVariant {
    /// Transcribe then speak the transcript back; no conversation state.
    Echo,
    /// Full conversational turn with persisted history.
    Conversation,
}

impl Default for PipelineVariant {
    fn default() -> Self {
        Self::Conversation
    }
}

/// Turn pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline variant
    #[serde(default)]
    pub variant: PipelineVariant,

    /// Pin one session id for the whole process; unset, each connection
    /// mints its own.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Per-provider-call timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            variant: PipelineVariant::default(),
            session_id: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
