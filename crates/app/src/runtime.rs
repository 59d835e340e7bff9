//! Consumer loop: drains the capture queue into the session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};

use voxwake_audio::AudioFrame;
use voxwake_foundation::ShutdownSignal;

use crate::session::{CycleOutcome, DictationSession};

/// How long the consumer waits for a frame before re-polling. Hitting the
/// timeout is an expected idle condition, not an error.
const FRAME_WAIT: Duration = Duration::from_secs(1);

/// Run the session until a quit command, shutdown signal, or closed
/// capture channel ends it. The session (state machine, buffer,
/// recognizer) is owned by this task; the frame queue is the only
/// cross-thread resource.
pub async fn run_session(
    mut session: DictationSession,
    mut frame_rx: mpsc::Receiver<AudioFrame>,
    shutdown: ShutdownSignal,
) {
    info!("Listening for the wake phrase");

    loop {
        if shutdown.is_requested() {
            info!("Shutdown requested, session loop exiting");
            break;
        }

        let frame = tokio::select! {
            _ = shutdown.wait() => {
                info!("Shutdown requested, session loop exiting");
                break;
            }
            received = time::timeout(FRAME_WAIT, frame_rx.recv()) => match received {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    warn!("Capture channel closed, session loop exiting");
                    break;
                }
                // No frames within the timeout: nothing to do, poll again.
                Err(_) => continue,
            }
        };

        if session.on_frame(frame).await == CycleOutcome::Exit {
            shutdown.request();
            break;
        }
    }
}
