//! Environment-sourced settings.
//!
//! Every knob has a default and can be overridden through the environment
//! (`WAKE_WORD=computer SEND_WORD="ship it" voxwake`). Keys are the
//! upper-case forms of the field names.

use config::{Config, Environment};
use serde::Deserialize;

use voxwake_audio::capture::CaptureConfig;
use voxwake_commands::CommandSet;
use voxwake_foundation::AppError;
use voxwake_stt::RecognizerOptions;
use voxwake_vad::GateConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Phrase that starts dictation.
    pub wake_word: String,
    /// Phrase that stops dictation.
    pub stop_word: String,
    /// Phrase that clears the focused field while idle.
    pub clear_word: String,
    /// Phrase (possibly multi-word) that presses Enter while dictating.
    pub send_word: String,
    /// Phrase that shuts the program down.
    pub quit_word: String,

    /// Path to the whisper model file.
    pub whisper_model: String,
    /// Capture rate delivered to the recognizer; whisper wants 16 kHz.
    pub sample_rate: u32,
    /// Seconds of audio per wake-detection window.
    pub chunk_duration: f64,
    /// Seconds of audio per dictation window.
    pub transcribe_duration: f64,
    /// Normalized RMS below which a window counts as silence.
    pub silence_threshold: f32,
    /// Recognizer-side no-speech sensitivity.
    pub no_speech_threshold: f32,
    /// Whether earlier transcripts condition later recognition calls.
    pub condition_on_previous_text: bool,
    /// Fraction of words that must look English for dictation to pass.
    pub english_word_threshold: f32,
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        Self::from_env()
            .map_err(|e| AppError::Config(e.to_string()))?
            .validated()
    }

    fn from_env() -> Result<Self, config::ConfigError> {
        let config = Config::builder()
            .set_default("wake_word", "bob")?
            .set_default("stop_word", "stop")?
            .set_default("clear_word", "zip")?
            .set_default("send_word", "go code it")?
            .set_default("quit_word", "exit")?
            .set_default("whisper_model", "models/ggml-base.en.bin")?
            .set_default("sample_rate", 16_000)?
            .set_default("chunk_duration", 2.0)?
            .set_default("transcribe_duration", 5.0)?
            .set_default("silence_threshold", 0.01)?
            .set_default("no_speech_threshold", 0.6)?
            .set_default("condition_on_previous_text", false)?
            .set_default("english_word_threshold", 0.7)?
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        config.try_deserialize()
    }

    fn validated(mut self) -> Result<Self, AppError> {
        for (name, phrase) in [
            ("WAKE_WORD", &mut self.wake_word),
            ("STOP_WORD", &mut self.stop_word),
            ("CLEAR_WORD", &mut self.clear_word),
            ("SEND_WORD", &mut self.send_word),
            ("QUIT_WORD", &mut self.quit_word),
        ] {
            let folded = phrase.trim().to_lowercase();
            if folded.is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
            *phrase = folded;
        }

        if self.sample_rate == 0 {
            return Err(AppError::Config("SAMPLE_RATE must be positive".into()));
        }
        if self.chunk_duration <= 0.0 {
            return Err(AppError::Config("CHUNK_DURATION must be positive".into()));
        }
        if self.transcribe_duration < self.chunk_duration {
            return Err(AppError::Config(
                "TRANSCRIBE_DURATION must not be shorter than CHUNK_DURATION".into(),
            ));
        }
        for (name, value) in [
            ("SILENCE_THRESHOLD", self.silence_threshold),
            ("NO_SPEECH_THRESHOLD", self.no_speech_threshold),
            ("ENGLISH_WORD_THRESHOLD", self.english_word_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(self)
    }

    pub fn command_set(&self) -> CommandSet {
        CommandSet::new(
            self.wake_word.as_str(),
            self.stop_word.as_str(),
            self.clear_word.as_str(),
            self.send_word.as_str(),
            self.quit_word.as_str(),
        )
    }

    pub fn recognizer_options(&self) -> RecognizerOptions {
        RecognizerOptions {
            model_path: self.whisper_model.clone(),
            language: "en".to_string(),
            no_speech_threshold: self.no_speech_threshold,
            condition_on_previous_text: self.condition_on_previous_text,
        }
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            silence_threshold: self.silence_threshold,
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate_hz: self.sample_rate,
            ..Default::default()
        }
    }

    pub fn wake_window_samples(&self) -> usize {
        (self.sample_rate as f64 * self.chunk_duration) as usize
    }

    pub fn dictation_window_samples(&self) -> usize {
        (self.sample_rate as f64 * self.transcribe_duration) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Settings {
        Settings {
            wake_word: "bob".into(),
            stop_word: "stop".into(),
            clear_word: "zip".into(),
            send_word: "go code it".into(),
            quit_word: "exit".into(),
            whisper_model: "models/ggml-base.en.bin".into(),
            sample_rate: 16_000,
            chunk_duration: 2.0,
            transcribe_duration: 5.0,
            silence_threshold: 0.01,
            no_speech_threshold: 0.6,
            condition_on_previous_text: false,
            english_word_threshold: 0.7,
        }
    }

    #[test]
    fn phrases_are_folded_and_trimmed() {
        let mut settings = base();
        settings.wake_word = "  Jarvis ".into();
        settings.send_word = "Ship It".into();
        let validated = settings.validated().unwrap();
        assert_eq!(validated.wake_word, "jarvis");
        assert_eq!(validated.send_word, "ship it");
    }

    #[test]
    fn empty_phrases_are_rejected() {
        let mut settings = base();
        settings.stop_word = "   ".into();
        assert!(matches!(
            settings.validated(),
            Err(AppError::Config(message)) if message.contains("STOP_WORD")
        ));
    }

    #[test]
    fn dictation_window_must_cover_wake_window() {
        let mut settings = base();
        settings.transcribe_duration = 1.0;
        assert!(settings.validated().is_err());
    }

    #[test]
    fn thresholds_must_be_fractions() {
        let mut settings = base();
        settings.english_word_threshold = 1.5;
        assert!(settings.validated().is_err());

        let mut settings = base();
        settings.silence_threshold = -0.1;
        assert!(settings.validated().is_err());
    }

    #[test]
    fn window_sizes_derive_from_rate_and_duration() {
        let settings = base().validated().unwrap();
        assert_eq!(settings.wake_window_samples(), 32_000);
        assert_eq!(settings.dictation_window_samples(), 80_000);
        assert_eq!(settings.capture_config().sample_rate_hz, 16_000);
    }

    #[test]
    fn component_configs_carry_the_right_knobs() {
        let settings = base().validated().unwrap();
        assert_eq!(settings.command_set().send, "go code it");
        assert_eq!(settings.recognizer_options().no_speech_threshold, 0.6);
        assert!(!settings.recognizer_options().condition_on_previous_text);
        assert_eq!(settings.gate_config().silence_threshold, 0.01);
    }
}
