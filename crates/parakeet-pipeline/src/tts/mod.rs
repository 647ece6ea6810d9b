//! Text-to-speech adapter
//!
//! Wraps an ElevenLabs-style synthesis endpoint: text plus voice parameters
//! in, compressed audio bytes out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use parakeet_core::VoiceSettings;

/// Synthesis adapter errors
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the request (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Provider returned no audio")]
    EmptyAudio,
}

/// Convert text to encoded audio bytes.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}

/// Configuration for the HTTP synthesis adapter
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    /// Synthesis endpoint base; the voice id is appended per call
    pub api_url: String,
    /// Provider API key
    pub api_key: String,
    /// Voice identifier
    pub voice_id: String,
    /// Model selector
    pub model: String,
    /// Output format selector (compressed, streaming-friendly)
    pub output_format: String,
    /// Voice rendering parameters
    pub voice: VoiceSettings,
    /// Per-call timeout
    pub timeout: Duration,
}

/// HTTP synthesis adapter
pub struct HttpTextToSpeech {
    config: SynthesizerConfig,
    client: Client,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

impl HttpTextToSpeech {
    pub fn new(config: SynthesizerConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }
}

#[async_trait]
impl TextToSpeech for HttpTextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let request = SynthesisRequest {
            text,
            model_id: &self.config.model,
            voice_settings: &self.config.voice,
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("output_format", self.config.output_format.as_str())])
            .header("xi-api-key", &self.config.api_key)
            .json(&request)
            .timeout(self.config.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, %body, "Synthesis request failed");
            return Err(TtsError::Api { status, body });
        }

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            // An empty body is a provider failure, never valid silence.
            return Err(TtsError::EmptyAudio);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let voice = VoiceSettings::default();
        let request = SynthesisRequest {
            text: "hello there",
            model_id: "eleven_flash_v2_5",
            voice_settings: &voice,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "hello there");
        assert_eq!(json["model_id"], "eleven_flash_v2_5");
        assert_eq!(json["voice_settings"]["stability"], 0.5);
        assert_eq!(json["voice_settings"]["similarity_boost"], 0.75);
        assert_eq!(json["voice_settings"]["use_speaker_boost"], true);
    }

    #[test]
    fn test_endpoint_joins_voice_id() {
        let synth = HttpTextToSpeech::new(SynthesizerConfig {
            api_url: "https://api.elevenlabs.io/v1/text-to-speech/".to_string(),
            api_key: "k".to_string(),
            voice_id: "voice123".to_string(),
            model: "m".to_string(),
            output_format: "mp3_22050_32".to_string(),
            voice: VoiceSettings::default(),
            timeout: Duration::from_secs(60),
        });
        assert_eq!(
            synth.endpoint(),
            "https://api.elevenlabs.io/v1/text-to-speech/voice123"
        );
    }
}
