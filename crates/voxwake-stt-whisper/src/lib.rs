//! Whisper-backed implementation of the VoxWake recognition interface.

use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use voxwake_stt::{RecognizerOptions, SpeechRecognizer, SttError};

/// whisper.cpp rejects sub-second inputs instead of returning empty text,
/// so short command windows are zero-padded up to this many samples.
const MIN_WINDOW_SAMPLES: usize = 16_000;

pub struct WhisperRecognizer {
    ctx: WhisperContext,
    options: RecognizerOptions,
}

impl WhisperRecognizer {
    /// Load the model named in `options`. The context is created once and
    /// reused for every window.
    pub fn new(options: RecognizerOptions) -> Result<Self, SttError> {
        if !Path::new(&options.model_path).exists() {
            return Err(SttError::ModelLoad(format!(
                "model file not found at {} (set WHISPER_MODEL to override)",
                options.model_path
            )));
        }

        let ctx = WhisperContext::new_with_params(
            &options.model_path,
            WhisperContextParameters::default(),
        )
        .map_err(|e| SttError::ModelLoad(e.to_string()))?;

        tracing::info!("Whisper context created from {}", options.model_path);
        Ok(Self { ctx, options })
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, SttError> {
        if samples.is_empty() {
            return Ok(String::new());
        }

        let audio = pad_to_min(samples, MIN_WINDOW_SAMPLES);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(4);
        params.set_language(Some(self.options.language.as_str()));
        params.set_no_context(!self.options.condition_on_previous_text);
        params.set_no_speech_thold(self.options.no_speech_threshold);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let num_segments = state.full_n_segments();
        let mut text = String::new();
        for i in 0..num_segments {
            if let Some(segment) = state.get_segment(i) {
                let piece = segment
                    .to_str()
                    .map_err(|e| SttError::Transcription(format!("segment {}: {}", i, e)))?;
                text.push_str(piece);
            }
        }

        Ok(text)
    }
}

fn pad_to_min(samples: &[f32], min_len: usize) -> Vec<f32> {
    let mut audio = samples.to_vec();
    if audio.len() < min_len {
        audio.resize(min_len, 0.0);
    }
    audio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_windows_are_padded_with_silence() {
        let padded = pad_to_min(&[0.5; 100], 16_000);
        assert_eq!(padded.len(), 16_000);
        assert_eq!(padded[99], 0.5);
        assert_eq!(padded[100], 0.0);
    }

    #[test]
    fn long_windows_pass_through() {
        let audio = vec![0.1; 32_000];
        assert_eq!(pad_to_min(&audio, 16_000).len(), 32_000);
    }

    #[test]
    fn missing_model_fails_at_construction() {
        let options = RecognizerOptions {
            model_path: "/nonexistent/model.bin".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            WhisperRecognizer::new(options),
            Err(SttError::ModelLoad(_))
        ));
    }
}
