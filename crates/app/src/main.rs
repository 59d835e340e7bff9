use anyhow::Context;
use tracing::{info, warn};

use voxwake_app::config::Settings;
use voxwake_app::runtime;
use voxwake_app::session::{DictationSession, SessionConfig};
use voxwake_audio::capture::CaptureThread;
use voxwake_commands::Classifier;
use voxwake_foundation::{AppState, ShutdownSignal, StateManager};
use voxwake_stt::SpeechRecognizer;
use voxwake_stt_whisper::WhisperRecognizer;
use voxwake_text_injection::{EnigoInjector, NoOpInjector, TextInjector};
use voxwake_vad::SilenceGate;

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    info!("Starting VoxWake v{}", env!("CARGO_PKG_VERSION"));

    let state_manager = StateManager::new();
    let shutdown = ShutdownSignal::install();

    let settings = Settings::load().context("loading configuration")?;
    let commands = settings.command_set();
    info!("Say these commands:");
    for (phrase, effect) in commands.describe() {
        info!("  '{}': {}", phrase, effect);
    }

    let recognizer: Box<dyn SpeechRecognizer> = Box::new(
        WhisperRecognizer::new(settings.recognizer_options())
            .context("loading the whisper model")?,
    );
    info!("Recognizer ready");

    let injector: Box<dyn TextInjector> = match EnigoInjector::new() {
        Ok(injector) => Box::new(injector),
        Err(e) => {
            warn!(
                "Keystroke injection unavailable: {} ({}); transcripts will only be logged",
                e,
                e.remediation_hint()
            );
            Box::new(NoOpInjector::new())
        }
    };
    info!("Injection backend: {}", injector.backend_name());

    let (capture, frame_rx) =
        CaptureThread::spawn(settings.capture_config()).context("starting audio capture")?;

    let session = DictationSession::new(
        settings.sample_rate,
        SessionConfig {
            wake_window_samples: settings.wake_window_samples(),
            dictation_window_samples: settings.dictation_window_samples(),
        },
        SilenceGate::new(settings.gate_config()),
        Classifier::new(commands, settings.english_word_threshold),
        recognizer,
        injector,
    );

    state_manager.transition(AppState::Running)?;
    runtime::run_session(session, frame_rx, shutdown.clone()).await;

    info!("Beginning graceful shutdown");
    state_manager.transition(AppState::Stopping)?;
    capture.stop();
    state_manager.transition(AppState::Stopped)?;
    info!("VoxWake exited");
    Ok(())
}
