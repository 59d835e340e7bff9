use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::{frame_samples, AudioFrame};
use voxwake_foundation::AudioError;

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Rate the frames handed to the consumer are delivered at; must match
    /// what the recognizer expects.
    pub sample_rate_hz: u32,
    /// Bound on the producer->consumer frame queue.
    pub queue_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: crate::SAMPLE_RATE_HZ,
            queue_capacity: 100,
        }
    }
}

/// Handle to the dedicated microphone thread.
///
/// The thread owns the cpal stream (streams are not `Send`) and pushes
/// fixed-duration mono frames into a bounded queue. Dropping the handle
/// stops capture.
pub struct CaptureThread {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl CaptureThread {
    /// Spawn the capture thread and return the frame receiver. Fails if the
    /// default input device is missing or the stream cannot be started.
    pub fn spawn(config: CaptureConfig) -> Result<(Self, mpsc::Receiver<AudioFrame>), AudioError> {
        let (frame_tx, frame_rx) = mpsc::channel(config.queue_capacity);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || run_capture(config, frame_tx, thread_running, ready_tx))
            .map_err(|e| AudioError::Fatal(format!("Failed to spawn audio thread: {}", e)))?;

        match ready_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Ok(())) => Ok((
                Self {
                    handle: Some(handle),
                    running,
                },
                frame_rx,
            )),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                running.store(false, Ordering::SeqCst);
                let _ = handle.join();
                Err(AudioError::Fatal(
                    "Audio capture did not start within 5s".to_string(),
                ))
            }
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CaptureThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_capture(
    config: CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    running: Arc<AtomicBool>,
    ready_tx: std::sync::mpsc::Sender<Result<(), AudioError>>,
) {
    match build_stream(&config, frame_tx, running.clone()) {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(50));
            }
            drop(stream);
            tracing::info!("Audio capture thread shutting down");
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

fn build_stream(
    config: &CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    running: Arc<AtomicBool>,
) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(AudioError::DeviceNotFound { name: None })?;
    let device_name = device.name().unwrap_or_else(|_| "<unknown>".to_string());

    let supported = device.default_input_config()?;
    let native_rate = supported.sample_rate();
    let channels = supported.channels();
    let sample_format = supported.sample_format();
    tracing::info!(
        "Capturing from '{}': {} Hz, {} ch, {:?}",
        device_name,
        native_rate,
        channels,
        sample_format
    );

    let stream_config: cpal::StreamConfig = supported.config();
    let slicer = FrameSlicer::new(native_rate, config.sample_rate_hz, channels, frame_tx);
    let err_fn = |err| tracing::warn!("Audio stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::I16 => {
            let mut slicer = slicer;
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        return;
                    }
                    slicer.push_i16(data);
                },
                err_fn,
                None,
            )?
        }
        SampleFormat::F32 => {
            let mut slicer = slicer;
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        return;
                    }
                    slicer.push_f32(data);
                },
                err_fn,
                None,
            )?
        }
        format => {
            return Err(AudioError::FormatNotSupported {
                format: format!("{:?}", format),
            });
        }
    };

    stream.play()?;
    tracing::info!("Microphone stream started");
    Ok(stream)
}

/// Accumulates callback buffers and emits fixed 100 ms mono frames at the
/// target rate.
struct FrameSlicer {
    channels: usize,
    native_rate: u32,
    target_rate: u32,
    native_block: usize,
    target_block: usize,
    pending: Vec<i16>,
    frame_tx: mpsc::Sender<AudioFrame>,
    dropped: u64,
}

impl FrameSlicer {
    fn new(
        native_rate: u32,
        target_rate: u32,
        channels: u16,
        frame_tx: mpsc::Sender<AudioFrame>,
    ) -> Self {
        Self {
            channels: channels as usize,
            native_rate,
            target_rate,
            native_block: frame_samples(native_rate),
            target_block: frame_samples(target_rate),
            pending: Vec::with_capacity(frame_samples(native_rate) * 2),
            frame_tx,
            dropped: 0,
        }
    }

    fn push_i16(&mut self, data: &[i16]) {
        let mono = downmix_to_mono(data, self.channels);
        self.pending.extend_from_slice(&mono);
        self.flush_ready();
    }

    fn push_f32(&mut self, data: &[f32]) {
        let ints: Vec<i16> = data
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .collect();
        let mono = downmix_to_mono(&ints, self.channels);
        self.pending.extend_from_slice(&mono);
        self.flush_ready();
    }

    fn flush_ready(&mut self) {
        while self.pending.len() >= self.native_block {
            let block: Vec<i16> = self.pending.drain(..self.native_block).collect();
            let samples = if self.native_rate == self.target_rate {
                block
            } else {
                resample_nearest(&block, self.target_block)
            };

            let frame = AudioFrame {
                samples,
                sample_rate: self.target_rate,
                timestamp: Instant::now(),
            };
            if self.frame_tx.try_send(frame).is_err() {
                self.dropped += 1;
                if self.dropped == 1 {
                    tracing::warn!("Frame queue full, dropping capture frames");
                } else {
                    tracing::debug!("Frame queue full ({} frames dropped)", self.dropped);
                }
            }
        }
    }
}

/// Average interleaved channels down to mono.
fn downmix_to_mono(samples: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Nearest-sample resampling of one block to `out_len` samples. Crude but
/// adequate for speech heading into a recognizer; devices already at the
/// target rate skip it entirely.
fn resample_nearest(block: &[i16], out_len: usize) -> Vec<i16> {
    if block.is_empty() || out_len == 0 {
        return Vec::new();
    }
    let ratio = block.len() as f32 / out_len as f32;
    (0..out_len)
        .map(|i| {
            let src = ((i as f32 * ratio) as usize).min(block.len() - 1);
            block[src]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_downmix_averages_pairs() {
        let samples = vec![1000i16, -1000, 900, -900, 800, -800];
        assert_eq!(downmix_to_mono(&samples, 2), vec![0, 0, 0]);
    }

    #[test]
    fn mono_downmix_is_identity() {
        let samples = vec![5i16, -5, 10];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn resample_preserves_endpoints() {
        let block: Vec<i16> = (0..480).collect::<Vec<_>>().iter().map(|&v| v as i16).collect();
        let out = resample_nearest(&block, 160);
        assert_eq!(out.len(), 160);
        assert_eq!(out[0], 0);
        assert!(*out.last().unwrap() >= 474);
    }

    #[test]
    fn resample_same_length_is_identity() {
        let block = vec![1i16, 2, 3, 4];
        assert_eq!(resample_nearest(&block, 4), block);
    }

    #[test]
    fn slicer_emits_fixed_frames() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut slicer = FrameSlicer::new(16_000, 16_000, 1, tx);

        // 1.5 frames of audio: exactly one frame comes out, remainder pends.
        slicer.push_i16(&vec![7i16; 2400]);
        let frame = rx.try_recv().expect("one frame ready");
        assert_eq!(frame.len(), 1600);
        assert!(rx.try_recv().is_err());
        assert_eq!(slicer.pending.len(), 800);

        // The next half frame completes the second one.
        slicer.push_i16(&vec![7i16; 800]);
        assert_eq!(rx.try_recv().expect("second frame").len(), 1600);
    }

    #[test]
    fn slicer_resamples_to_target_rate() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut slicer = FrameSlicer::new(48_000, 16_000, 1, tx);

        slicer.push_i16(&vec![3i16; 4800]);
        let frame = rx.try_recv().expect("frame ready");
        assert_eq!(frame.sample_rate, 16_000);
        assert_eq!(frame.len(), 1600);
    }

    #[test]
    fn slicer_counts_drops_when_queue_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut slicer = FrameSlicer::new(16_000, 16_000, 1, tx);

        slicer.push_i16(&vec![0i16; 1600 * 3]);
        assert_eq!(slicer.dropped, 2);
        assert_eq!(rx.try_recv().expect("first frame kept").len(), 1600);
    }
}
