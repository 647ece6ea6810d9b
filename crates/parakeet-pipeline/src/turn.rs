//! Turn pipeline orchestrator
//!
//! One `process` call is one turn: audio in, audio out. Every stage failure
//! degrades to empty bytes; the pipeline stays healthy for the next turn.
//!
//! Stage sequence per invocation:
//! received → transcribing → (empty transcript → done) | generating →
//! synthesizing → done. No stage is retried.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use parakeet_agent::ResponseGenerator;

use crate::stt::{SpeechToText, SttError};
use crate::tts::TextToSpeech;

/// One full audio-in → audio-out turn.
#[async_trait]
pub trait TurnPipeline: Send + Sync {
    /// Process one audio buffer. Never fails: any stage failure yields
    /// empty bytes, which the caller must treat as "no response", not as
    /// valid silence.
    async fn process(&self, audio: &[u8]) -> Vec<u8>;
}

/// Stateless pipeline: the transcript is spoken straight back.
///
/// No conversation state; used to exercise transcription and synthesis
/// end to end without a language model in the loop.
pub struct EchoPipeline {
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
}

impl EchoPipeline {
    pub fn new(stt: Arc<dyn SpeechToText>, tts: Arc<dyn TextToSpeech>) -> Self {
        Self { stt, tts }
    }
}

#[async_trait]
impl TurnPipeline for EchoPipeline {
    async fn process(&self, audio: &[u8]) -> Vec<u8> {
        let transcript = match self.stt.transcribe(audio).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Transcription failed");
                String::new()
            }
        };

        if transcript.is_empty() {
            tracing::debug!("No transcription available");
            return Vec::new();
        }

        tracing::info!(%transcript, "Echoing transcript");
        synthesize_or_empty(self.tts.as_ref(), &transcript).await
    }
}

/// Stateful pipeline: full conversational turn over persisted history.
///
/// One instance is bound to one session. Overlapping `process` calls on
/// the same instance serialize through the turn lock, keeping the
/// generator's read-then-append history pattern free of interleaving.
pub struct ConversationPipeline {
    session_id: String,
    stt: Arc<dyn SpeechToText>,
    generator: Arc<ResponseGenerator>,
    tts: Arc<dyn TextToSpeech>,
    turn_lock: Mutex<()>,
}

impl ConversationPipeline {
    pub fn new(
        session_id: impl Into<String>,
        stt: Arc<dyn SpeechToText>,
        generator: Arc<ResponseGenerator>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            stt,
            generator,
            tts,
            turn_lock: Mutex::new(()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[async_trait]
impl TurnPipeline for ConversationPipeline {
    async fn process(&self, audio: &[u8]) -> Vec<u8> {
        // At most one in-flight turn per session.
        let _turn = self.turn_lock.lock().await;

        // The transcription provider in this deployment takes a file
        // handle, so the buffer is materialized to a temp file that is
        // removed when it drops, on success and failure alike.
        let transcript = match materialize(audio).await {
            Ok(file) => match self.stt.transcribe_file(file.path()).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(session_id = %self.session_id, error = %e, "Transcription failed");
                    String::new()
                }
            },
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Failed to stage audio");
                String::new()
            }
        };

        if transcript.is_empty() {
            tracing::debug!(session_id = %self.session_id, "No transcription available");
            return Vec::new();
        }

        tracing::info!(session_id = %self.session_id, %transcript, "Transcribed user turn");

        let reply = self.generator.generate(&self.session_id, &transcript).await;
        synthesize_or_empty(self.tts.as_ref(), &reply).await
    }
}

/// Map synthesis failure to the empty sentinel.
async fn synthesize_or_empty(tts: &dyn TextToSpeech, text: &str) -> Vec<u8> {
    match tts.synthesize(text).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Synthesis failed");
            Vec::new()
        }
    }
}

/// Write the audio buffer to a temp file on the blocking pool.
async fn materialize(audio: &[u8]) -> Result<NamedTempFile, SttError> {
    let bytes = audio.to_vec();
    tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(|e| SttError::Join(e.to_string()))?
    .map_err(SttError::Io)
}
