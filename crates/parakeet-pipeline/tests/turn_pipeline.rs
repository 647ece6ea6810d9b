//! Integration tests for the turn pipeline (STT -> generation -> TTS)
//!
//! Providers are test doubles; the tests verify the sentinel contract,
//! short-circuiting, history recording, and per-session turn ordering.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use parakeet_agent::ResponseGenerator;
use parakeet_core::{Message, Role};
use parakeet_llm::{ChatModel, LlmError};
use parakeet_pipeline::audio::pcm_to_wav;
use parakeet_pipeline::{
    ConversationPipeline, EchoPipeline, SpeechToText, SttError, TextToSpeech, TtsError,
    TurnPipeline,
};
use parakeet_store::{ConversationStore, MemoryConversationStore};

/// Transcriber double: a scripted transcript, or a permanent failure.
struct ScriptedStt {
    transcript: Option<String>,
    calls: AtomicUsize,
    seen_paths: Mutex<Vec<PathBuf>>,
}

impl ScriptedStt {
    fn ok(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            transcript: None,
            calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    fn result(&self) -> Result<String, SttError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcript
            .clone()
            .ok_or_else(|| SttError::Api {
                status: 500,
                body: "provider down".to_string(),
            })
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, SttError> {
        self.result()
    }

    async fn transcribe_file(&self, path: &Path) -> Result<String, SttError> {
        self.seen_paths.lock().push(path.to_path_buf());
        self.result()
    }
}

/// Synthesizer double: `spoken:<text>` bytes, or a permanent failure.
struct ScriptedTts {
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedTts {
    fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextToSpeech for ScriptedTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TtsError::EmptyAudio);
        }
        Ok(format!("spoken:{text}").into_bytes())
    }
}

/// Chat model double with an optional artificial delay.
struct ScriptedModel {
    reply: String,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    fn slow(reply: &str, delay: Duration) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _messages: &[Message]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.reply.clone())
    }
}

fn conversation_pipeline(
    stt: Arc<ScriptedStt>,
    model: Arc<ScriptedModel>,
    tts: Arc<ScriptedTts>,
    store: Arc<MemoryConversationStore>,
) -> ConversationPipeline {
    let generator = Arc::new(ResponseGenerator::new(store, model));
    ConversationPipeline::new("s1", stt, generator, tts)
}

fn silent_wav() -> Vec<u8> {
    pcm_to_wav(&vec![0.0; 320], 16_000)
}

#[tokio::test]
async fn test_empty_transcript_short_circuits() {
    let stt = Arc::new(ScriptedStt::ok(""));
    let model = Arc::new(ScriptedModel::new("unused"));
    let tts = Arc::new(ScriptedTts::ok());
    let store = Arc::new(MemoryConversationStore::new());
    let pipeline = conversation_pipeline(stt, model.clone(), tts.clone(), store.clone());

    let out = pipeline.process(&silent_wav()).await;
    assert_eq!(out, b"");

    // Generation and synthesis are skipped entirely.
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert_eq!(tts.calls.load(Ordering::SeqCst), 0);
    assert!(store.messages("s1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_transcriber_always_yields_empty() {
    let stt = Arc::new(ScriptedStt::failing());
    let model = Arc::new(ScriptedModel::new("unused"));
    let tts = Arc::new(ScriptedTts::ok());
    let store = Arc::new(MemoryConversationStore::new());
    let pipeline = conversation_pipeline(stt.clone(), model, tts, store);

    for _ in 0..3 {
        assert_eq!(pipeline.process(&silent_wav()).await, b"");
    }
    assert_eq!(stt.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_successful_turn_records_history_and_speaks() {
    let stt = Arc::new(ScriptedStt::ok("hello"));
    let model = Arc::new(ScriptedModel::new("hi! how can I help?"));
    let tts = Arc::new(ScriptedTts::ok());
    let store = Arc::new(MemoryConversationStore::new());
    let pipeline = conversation_pipeline(stt, model, tts, store.clone());

    let out = pipeline.process(&silent_wav()).await;
    assert_eq!(out, b"spoken:hi! how can I help?");

    let history = store.messages("s1").await.unwrap();
    assert_eq!(
        history,
        vec![
            Message::user("hello"),
            Message::assistant("hi! how can I help?"),
        ]
    );
}

#[tokio::test]
async fn test_synthesis_failure_preserves_recorded_turn() {
    let stt = Arc::new(ScriptedStt::ok("hello"));
    let model = Arc::new(ScriptedModel::new("a reply"));
    let tts = Arc::new(ScriptedTts::failing());
    let store = Arc::new(MemoryConversationStore::new());
    let pipeline = conversation_pipeline(stt, model, tts, store.clone());

    let out = pipeline.process(&silent_wav()).await;
    assert_eq!(out, b"");

    // The exchange was persisted before synthesis was attempted.
    let history = store.messages("s1").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], Message::user("hello"));
    assert_eq!(history[1], Message::assistant("a reply"));
}

#[tokio::test]
async fn test_temp_audio_file_is_removed_after_turn() {
    let stt = Arc::new(ScriptedStt::ok(""));
    let model = Arc::new(ScriptedModel::new("unused"));
    let tts = Arc::new(ScriptedTts::ok());
    let store = Arc::new(MemoryConversationStore::new());
    let pipeline = conversation_pipeline(stt.clone(), model, tts, store);

    pipeline.process(&silent_wav()).await;

    let paths = stt.seen_paths.lock();
    assert_eq!(paths.len(), 1);
    // Removed even though the turn ended early.
    assert!(!paths[0].exists());
}

#[tokio::test]
async fn test_overlapping_turns_do_not_interleave_history() {
    let stt = Arc::new(ScriptedStt::ok("hello"));
    let model = Arc::new(ScriptedModel::slow("a reply", Duration::from_millis(50)));
    let tts = Arc::new(ScriptedTts::ok());
    let store = Arc::new(MemoryConversationStore::new());
    let pipeline = conversation_pipeline(stt, model, tts, store.clone());

    let audio = silent_wav();
    let (a, b) = tokio::join!(pipeline.process(&audio), pipeline.process(&audio));
    assert_eq!(a, b"spoken:a reply");
    assert_eq!(b, b"spoken:a reply");

    // Turns serialized: strict user/assistant alternation, no interleaving.
    let roles: Vec<Role> = store
        .messages("s1")
        .await
        .unwrap()
        .iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn test_echo_pipeline_speaks_transcript_verbatim() {
    let stt = Arc::new(ScriptedStt::ok("hello world"));
    let tts = Arc::new(ScriptedTts::ok());
    let pipeline = EchoPipeline::new(stt, tts.clone());

    let out = pipeline.process(&silent_wav()).await;
    assert_eq!(out, b"spoken:hello world");
    assert_eq!(tts.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_echo_pipeline_maps_failures_to_empty() {
    // Transcription failure
    let pipeline = EchoPipeline::new(
        Arc::new(ScriptedStt::failing()),
        Arc::new(ScriptedTts::ok()),
    );
    assert_eq!(pipeline.process(&silent_wav()).await, b"");

    // Synthesis failure
    let pipeline = EchoPipeline::new(
        Arc::new(ScriptedStt::ok("hi")),
        Arc::new(ScriptedTts::failing()),
    );
    assert_eq!(pipeline.process(&silent_wav()).await, b"");
}
