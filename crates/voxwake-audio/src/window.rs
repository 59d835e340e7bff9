use std::collections::VecDeque;
use std::time::Duration;

use crate::AudioFrame;

/// A contiguous span of buffered audio submitted to the recognizer as one
/// unit.
#[derive(Debug, Clone)]
pub struct AudioWindow {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioWindow {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Samples normalized to [-1, 1] for the recognizer.
    pub fn to_normalized(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32 / 32768.0).collect()
    }
}

/// Rolling buffer of capture frames.
///
/// Frames are appended as they arrive; the session decides when the
/// accumulated span is long enough to hand to the recognizer, and what to
/// keep across cycles. The assembler never grows without bound while idle:
/// [`WindowAssembler::enforce_idle_cap`] trims the oldest frames once the
/// backlog exceeds three wake windows.
pub struct WindowAssembler {
    frames: VecDeque<AudioFrame>,
    buffered_samples: usize,
    sample_rate: u32,
}

impl WindowAssembler {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            frames: VecDeque::new(),
            buffered_samples: 0,
            sample_rate,
        }
    }

    pub fn push(&mut self, frame: AudioFrame) {
        debug_assert_eq!(frame.sample_rate, self.sample_rate);
        self.buffered_samples += frame.len();
        self.frames.push_back(frame);
    }

    pub fn buffered_samples(&self) -> usize {
        self.buffered_samples
    }

    pub fn buffered_duration(&self) -> Duration {
        Duration::from_secs_f64(self.buffered_samples as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Concatenate the buffered frames without consuming them. Returns
    /// `None` when nothing is buffered, so an empty buffer can never yield
    /// a window.
    pub fn assemble(&self) -> Option<AudioWindow> {
        if self.frames.is_empty() {
            return None;
        }
        let mut samples = Vec::with_capacity(self.buffered_samples);
        for frame in &self.frames {
            samples.extend_from_slice(&frame.samples);
        }
        Some(AudioWindow {
            samples,
            sample_rate: self.sample_rate,
        })
    }

    /// Remove and return everything buffered as one window, clearing the
    /// buffer. `None` when already empty.
    pub fn drain_window(&mut self) -> Option<AudioWindow> {
        let window = self.assemble()?;
        self.clear();
        Some(window)
    }

    /// Keep only the newest `n` frames, discarding earlier context.
    pub fn retain_tail(&mut self, n: usize) {
        while self.frames.len() > n {
            if let Some(frame) = self.frames.pop_front() {
                self.buffered_samples -= frame.len();
            }
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.buffered_samples = 0;
    }

    /// Idle-state retention policy: once the backlog exceeds three wake
    /// windows, drop the oldest frames until at most two window-equivalents
    /// remain. Bounds memory and keeps wake latency flat no matter how long
    /// the system sits idle.
    pub fn enforce_idle_cap(&mut self, window_samples: usize) {
        if self.buffered_samples <= window_samples * 3 {
            return;
        }
        while self.buffered_samples > window_samples * 2 {
            match self.frames.pop_front() {
                Some(frame) => self.buffered_samples -= frame.len(),
                None => break,
            }
        }
    }
}
