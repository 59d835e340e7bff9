//! Recognizer configuration shared by engine crates

use serde::{Deserialize, Serialize};

/// Knobs passed through to the recognition engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerOptions {
    /// Path to the model file or directory.
    pub model_path: String,
    /// Language the recognizer is pinned to.
    pub language: String,
    /// Engine-side no-speech sensitivity; higher suppresses more.
    pub no_speech_threshold: f32,
    /// Whether earlier transcripts condition the next call. Off by default
    /// so command windows are independent of dictation history.
    pub condition_on_previous_text: bool,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        // Model path can come from the environment, falling back to the
        // conventional location.
        let model_path = std::env::var("WHISPER_MODEL")
            .unwrap_or_else(|_| "models/ggml-base.en.bin".to_string());

        Self {
            model_path,
            language: "en".to_string(),
            no_speech_threshold: 0.6,
            condition_on_previous_text: false,
        }
    }
}
