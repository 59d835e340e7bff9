//! The two-state dictation session.
//!
//! Owned entirely by the consumer task: frames come in, and depending on
//! the session state the accumulated window is either scanned for the wake
//! phrase (Idle) or relayed as dictation (Dictating). Recognition runs on
//! the blocking pool, one call in flight at a time, so responsiveness is
//! bounded by window duration plus one recognition call.

use tracing::{debug, info, warn};

use voxwake_audio::{AudioFrame, AudioWindow, WindowAssembler};
use voxwake_commands::{Classification, Classifier, SessionState};
use voxwake_stt::{tidy_transcript, SpeechRecognizer};
use voxwake_text_injection::TextInjector;
use voxwake_vad::SilenceGate;

/// What the runtime should do after feeding a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Continue,
    /// A quit command was recognized; the caller terminates the process.
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Samples per wake-detection window.
    pub wake_window_samples: usize,
    /// Samples per dictation window; longer, since utterances are longer.
    pub dictation_window_samples: usize,
}

pub struct DictationSession {
    assembler: WindowAssembler,
    gate: SilenceGate,
    classifier: Classifier,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    injector: Box<dyn TextInjector>,
    state: SessionState,
    config: SessionConfig,
}

impl DictationSession {
    pub fn new(
        sample_rate: u32,
        config: SessionConfig,
        gate: SilenceGate,
        classifier: Classifier,
        recognizer: Box<dyn SpeechRecognizer>,
        injector: Box<dyn TextInjector>,
    ) -> Self {
        Self {
            assembler: WindowAssembler::new(sample_rate),
            gate,
            classifier,
            recognizer: Some(recognizer),
            injector,
            state: SessionState::Idle,
            config,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffered_samples(&self) -> usize {
        self.assembler.buffered_samples()
    }

    /// Feed one capture frame; runs at most one recognition cycle.
    pub async fn on_frame(&mut self, frame: AudioFrame) -> CycleOutcome {
        self.assembler.push(frame);
        match self.state {
            SessionState::Idle => self.idle_cycle().await,
            SessionState::Dictating => self.dictation_cycle().await,
        }
    }

    /// Idle: wait for a full wake window, then look for wake/clear/quit.
    async fn idle_cycle(&mut self) -> CycleOutcome {
        self.assembler
            .enforce_idle_cap(self.config.wake_window_samples);
        if self.assembler.buffered_samples() < self.config.wake_window_samples {
            return CycleOutcome::Continue;
        }
        let Some(window) = self.assembler.assemble() else {
            return CycleOutcome::Continue;
        };

        let text = self.transcribe(&window).await;
        match self.classifier.classify(&text, SessionState::Idle) {
            Classification::Quit => {
                info!("Quit command recognized, shutting down");
                return CycleOutcome::Exit;
            }
            Classification::Clear => {
                info!("Clearing focused field");
                self.dispatch_clear().await;
                self.assembler.clear();
            }
            Classification::Wake => {
                info!(
                    "Wake phrase heard, dictation started (say '{}' to stop)",
                    self.classifier.commands().stop
                );
                self.assembler.clear();
                self.state = SessionState::Dictating;
            }
            _ => {
                // No match: slide the window by keeping only the newest
                // frame so a wake phrase split across windows still lands.
                self.assembler.retain_tail(1);
            }
        }
        CycleOutcome::Continue
    }

    /// Dictating: wait for a full dictation window, then relay it.
    async fn dictation_cycle(&mut self) -> CycleOutcome {
        if self.assembler.buffered_samples() < self.config.dictation_window_samples {
            return CycleOutcome::Continue;
        }
        let Some(window) = self.assembler.drain_window() else {
            return CycleOutcome::Continue;
        };

        let text = self.transcribe(&window).await;
        match self.classifier.classify(&text, SessionState::Dictating) {
            Classification::Quit => {
                info!("Quit command recognized mid-dictation, shutting down");
                return CycleOutcome::Exit;
            }
            Classification::Send => {
                info!("Send command, pressing Enter");
                self.dispatch_enter().await;
                info!("Dictation stopped");
                self.state = SessionState::Idle;
            }
            Classification::Stop => {
                info!("Dictation stopped");
                self.state = SessionState::Idle;
            }
            Classification::TypeThenStop(text) => {
                self.dispatch_type(&text).await;
                info!("Dictation stopped");
                self.state = SessionState::Idle;
            }
            Classification::Dictation(text) => {
                self.dispatch_type(&text).await;
            }
            Classification::Empty => {}
            // Clear and Wake are idle-only; the classifier never produces
            // them for a dictating session.
            Classification::Clear | Classification::Wake => {}
        }
        CycleOutcome::Continue
    }

    /// Run one blocking recognition call and tidy its output. Failures are
    /// logged and collapse to empty text; the session keeps running.
    async fn transcribe(&mut self, window: &AudioWindow) -> String {
        // Any window in these paths may carry a command, so it is
        // transcribed regardless of the gate; the verdict is still logged
        // to make silence-threshold tuning observable.
        debug!(
            rms = self.gate.level(&window.samples),
            has_speech = self.gate.has_speech(&window.samples),
            "Transcribing {} ms window",
            window.duration().as_millis()
        );

        let Some(mut recognizer) = self.recognizer.take() else {
            warn!("Recognizer is gone; treating window as silent");
            return String::new();
        };

        let samples = window.to_normalized();
        let joined = tokio::task::spawn_blocking(move || {
            let result = recognizer.transcribe(&samples);
            (recognizer, result)
        })
        .await;

        match joined {
            Ok((recognizer, Ok(text))) => {
                self.recognizer = Some(recognizer);
                tidy_transcript(&text)
            }
            Ok((recognizer, Err(e))) => {
                self.recognizer = Some(recognizer);
                warn!("Transcription failed: {}", e);
                String::new()
            }
            Err(e) => {
                warn!("Recognition task panicked: {}", e);
                String::new()
            }
        }
    }

    async fn dispatch_type(&mut self, text: &str) {
        info!("Typing: {}", text);
        if let Err(e) = self.injector.type_text(text).await {
            warn!("Could not type text: {} ({})", e, e.remediation_hint());
        }
    }

    async fn dispatch_enter(&mut self) {
        if let Err(e) = self.injector.press_enter().await {
            warn!("Could not press Enter: {} ({})", e, e.remediation_hint());
        }
    }

    async fn dispatch_clear(&mut self) {
        if let Err(e) = self.injector.clear_field().await {
            warn!("Could not clear field: {} ({})", e, e.remediation_hint());
        }
    }
}
