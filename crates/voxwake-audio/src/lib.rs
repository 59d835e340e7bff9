//! Microphone capture and audio windowing.
//!
//! One capture thread produces fixed-duration mono frames into a bounded
//! queue; the consumer accumulates them with [`window::WindowAssembler`]
//! until a recognition window is ready.

use std::time::Instant;

pub mod capture;
pub mod window;

pub use capture::{CaptureConfig, CaptureThread};
pub use window::{AudioWindow, WindowAssembler};

/// Canonical sample rate expected by the recognizer (Hz).
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Duration of one capture frame in milliseconds.
pub const FRAME_DURATION_MS: u32 = 100;

/// Number of samples in one capture frame at the given rate.
pub const fn frame_samples(sample_rate_hz: u32) -> usize {
    (sample_rate_hz * FRAME_DURATION_MS / 1000) as usize
}

/// Fixed-duration block of mono PCM delivered by the capture thread.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub timestamp: Instant,
}

impl AudioFrame {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
