//! Speech-to-text adapter
//!
//! Wraps a Groq-style transcription endpoint. Input audio is normalized to
//! the canonical WAV container before upload; the CPU-bound decode runs on
//! the blocking pool so the connection loop stays responsive.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;

use crate::audio::{self, AudioError};

/// Transcription adapter errors
#[derive(Error, Debug)]
pub enum SttError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the request (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Blocking task failed: {0}")]
    Join(String),
}

/// Convert audio to plain text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe raw audio bytes in any decodable container.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SttError>;

    /// Transcribe an already-materialized audio file.
    async fn transcribe_file(&self, path: &Path) -> Result<String, SttError>;
}

/// Configuration for the HTTP transcription adapter
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// Transcription endpoint
    pub api_url: String,
    /// Bearer API key
    pub api_key: String,
    /// Model selector
    pub model: String,
    /// Per-call timeout
    pub timeout: Duration,
}

/// HTTP transcription adapter
pub struct HttpSpeechToText {
    config: TranscriberConfig,
    client: Client,
}

impl HttpSpeechToText {
    pub fn new(config: TranscriberConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Upload canonical WAV bytes and extract the transcript text.
    async fn submit(&self, wav: Vec<u8>, file_name: String) -> Result<String, SttError> {
        let part = Part::bytes(wav).file_name(file_name).mime_str("audio/wav")?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .multipart(form)
            .timeout(self.config.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, %body, "Transcription request failed");
            return Err(SttError::Api { status, body });
        }

        let data: serde_json::Value = response.json().await?;
        data.get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| SttError::MalformedResponse("response has no text field".to_string()))
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechToText {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SttError> {
        let bytes = audio.to_vec();
        let wav = tokio::task::spawn_blocking(move || audio::convert_to_wav(&bytes))
            .await
            .map_err(|e| SttError::Join(e.to_string()))??;

        self.submit(wav, "audio.wav".to_string()).await
    }

    async fn transcribe_file(&self, path: &Path) -> Result<String, SttError> {
        let bytes = tokio::fs::read(path).await?;
        let wav = tokio::task::spawn_blocking(move || audio::convert_to_wav(&bytes))
            .await
            .map_err(|e| SttError::Join(e.to_string()))??;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        self.submit(wav, file_name).await
    }
}
