//! Turn-processing pipeline for the Parakeet voice agent
//!
//! This crate owns the transcribe → generate → synthesize sequence:
//! - Audio normalization to a canonical WAV container
//! - Speech-to-text and text-to-speech provider adapters
//! - The `TurnPipeline` orchestrator in its two deployment variants
//!
//! Adapters surface failures as explicit error values; the pipeline maps
//! every failure to the empty sentinel (`""` / `b""`) at its boundary, so a
//! caller of `process` never observes an error, only silence.

pub mod audio;
pub mod stt;
pub mod tts;
pub mod turn;

pub use audio::{convert_to_wav, AudioError};
pub use stt::{HttpSpeechToText, SpeechToText, SttError, TranscriberConfig};
pub use tts::{HttpTextToSpeech, SynthesizerConfig, TextToSpeech, TtsError};
pub use turn::{ConversationPipeline, EchoPipeline, TurnPipeline};
