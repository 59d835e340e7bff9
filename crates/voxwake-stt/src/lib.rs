//! Speech-to-text abstraction layer for VoxWake
//!
//! The pipeline treats recognition as a black box: one window of normalized
//! samples in, one string out. Engine crates implement [`SpeechRecognizer`];
//! the session never sees engine details.

use thiserror::Error;

pub mod mock;
pub mod types;

pub use types::RecognizerOptions;

#[derive(Debug, Error)]
pub enum SttError {
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),
}

/// Converts one audio window into text.
///
/// Samples are mono, normalized to [-1, 1], at the rate the engine was
/// configured for. Implementations must tolerate short or silent windows
/// and return an empty string for them rather than failing.
pub trait SpeechRecognizer: Send {
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, SttError>;
}

/// Clean up raw recognizer output before classification: surrounding
/// whitespace and the trailing periods whisper models like to append.
pub fn tidy_transcript(raw: &str) -> String {
    raw.trim().trim_end_matches('.').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tidy_strips_whitespace_and_trailing_periods() {
        assert_eq!(tidy_transcript("  hello world.  "), "hello world");
        assert_eq!(tidy_transcript("stop..."), "stop");
        assert_eq!(tidy_transcript("\n"), "");
    }

    #[test]
    fn tidy_keeps_interior_punctuation() {
        assert_eq!(tidy_transcript("it's done, then."), "it's done, then");
        assert_eq!(tidy_transcript("3.14 please"), "3.14 please");
    }
}
