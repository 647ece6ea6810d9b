//! Application state
//!
//! Collaborators are constructed once at startup and injected explicitly;
//! nothing is an ambient singleton, so every component can be replaced with
//! a test double.

use std::sync::Arc;
use std::time::Duration;

use parakeet_agent::ResponseGenerator;
use parakeet_config::{PipelineVariant, Settings};
use parakeet_llm::{ChatModelConfig, HttpChatModel};
use parakeet_pipeline::{
    ConversationPipeline, EchoPipeline, HttpSpeechToText, HttpTextToSpeech, SpeechToText,
    SynthesizerConfig, TextToSpeech, TranscriberConfig, TurnPipeline,
};
use parakeet_store::{SqliteConfig, SqliteConversationStore};

use crate::ServerError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    generator: Arc<ResponseGenerator>,
}

impl AppState {
    /// Build production state: open the store, wire the provider clients.
    pub async fn new(config: Settings) -> Result<Self, ServerError> {
        let store = SqliteConversationStore::open(SqliteConfig {
            path: config.store.path.clone(),
            busy_timeout_ms: config.store.busy_timeout_ms,
            pool_max_size: config.store.pool_max_size,
        })?;
        store.ensure_schema().await?;

        let timeout = Duration::from_secs(config.pipeline.request_timeout_secs);

        let stt: Arc<dyn SpeechToText> = Arc::new(HttpSpeechToText::new(TranscriberConfig {
            api_url: config.stt.api_url.clone(),
            api_key: config.stt.api_key.clone(),
            model: config.stt.model.clone(),
            timeout,
        }));

        let tts: Arc<dyn TextToSpeech> = Arc::new(HttpTextToSpeech::new(SynthesizerConfig {
            api_url: config.tts.api_url.clone(),
            api_key: config.tts.api_key.clone(),
            voice_id: config.tts.voice_id.clone(),
            model: config.tts.model.clone(),
            output_format: config.tts.output_format.clone(),
            voice: config.tts.voice.clone(),
            timeout,
        }));

        let model = Arc::new(HttpChatModel::new(ChatModelConfig {
            api_url: config.llm.api_url.clone(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            timeout,
        }));

        let generator = Arc::new(ResponseGenerator::new(Arc::new(store), model));

        Ok(Self::from_parts(config, stt, generator, tts))
    }

    /// Assemble state from prebuilt collaborators.
    pub fn from_parts(
        config: Settings,
        stt: Arc<dyn SpeechToText>,
        generator: Arc<ResponseGenerator>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            stt,
            tts,
            generator,
        }
    }

    /// Session id for a new connection: the pinned id when configured,
    /// otherwise a fresh one per connection.
    pub fn connection_session_id(&self) -> String {
        self.config
            .pipeline
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }

    /// Build the configured pipeline variant for one session.
    pub fn pipeline_for_session(&self, session_id: &str) -> Arc<dyn TurnPipeline> {
        match self.config.pipeline.variant {
            PipelineVariant::Echo => {
                Arc::new(EchoPipeline::new(self.stt.clone(), self.tts.clone()))
            }
            PipelineVariant::Conversation => Arc::new(ConversationPipeline::new(
                session_id,
                self.stt.clone(),
                self.generator.clone(),
                self.tts.clone(),
            )),
        }
    }
}
