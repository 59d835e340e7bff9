use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Audio subsystem error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Input device not found: {name:?}")]
    DeviceNotFound { name: Option<String> },

    #[error("Sample format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("Frame queue full, dropped {dropped} frames so far")]
    QueueOverflow { dropped: u64 },

    #[error("CPAL error: {0}")]
    Cpal(#[from] cpal::StreamError),

    #[error("Build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Default stream config error: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

/// How the main loop should react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Log and keep running; the condition is transient or cosmetic.
    Continue,
    /// Tear the process down.
    Fatal,
}

impl AppError {
    pub fn recovery(&self) -> Recovery {
        match self {
            AppError::Audio(AudioError::QueueOverflow { .. }) => Recovery::Continue,
            AppError::Audio(_) => Recovery::Fatal,
            AppError::Config(_) => Recovery::Fatal,
            AppError::ShutdownRequested | AppError::Fatal(_) => Recovery::Fatal,
        }
    }
}
