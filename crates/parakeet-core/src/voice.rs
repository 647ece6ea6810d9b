//! Voice rendering parameters

use serde::{Deserialize, Serialize};

/// Synthesis voice parameters
///
/// Sent verbatim to the synthesis provider on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice stability (0.0 - 1.0)
    #[serde(default = "default_stability")]
    pub stability: f32,

    /// Similarity boost (0.0 - 1.0)
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,

    /// Style exaggeration (0.0 - 1.0)
    #[serde(default)]
    pub style: f32,

    /// Enable speaker boost
    #[serde(default = "default_speaker_boost")]
    pub use_speaker_boost: bool,

    /// Playback speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_stability() -> f32 {
    0.5
}

fn default_similarity_boost() -> f32 {
    0.75
}

fn default_speaker_boost() -> bool {
    true
}

fn default_speed() -> f32 {
    1.0
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: 0.0,
            use_speaker_boost: default_speaker_boost(),
            speed: default_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_settings_defaults() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.stability, 0.5);
        assert_eq!(settings.similarity_boost, 0.75);
        assert_eq!(settings.style, 0.0);
        assert!(settings.use_speaker_boost);
        assert_eq!(settings.speed, 1.0);
    }

    #[test]
    fn test_voice_settings_partial_deserialization() {
        let settings: VoiceSettings = serde_json::from_str(r#"{"stability": 0.9}"#).unwrap();
        assert_eq!(settings.stability, 0.9);
        assert_eq!(settings.similarity_boost, 0.75);
        assert!(settings.use_speaker_boost);
    }
}
