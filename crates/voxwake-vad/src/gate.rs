use serde::{Deserialize, Serialize};

use crate::energy::rms;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateConfig {
    /// Normalized RMS level below which a window is treated as silence.
    pub silence_threshold: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 0.01,
        }
    }
}

/// Decides whether a window plausibly contains speech.
///
/// Used to skip recognition calls that could only transcribe noise. Windows
/// that may carry a command are transcribed regardless of this gate, so a
/// quietly spoken command is never dropped here.
pub struct SilenceGate {
    threshold: f32,
}

impl SilenceGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            threshold: config.silence_threshold,
        }
    }

    pub fn has_speech(&self, window: &[i16]) -> bool {
        rms(window) > self.threshold
    }

    /// The measured level, for per-window diagnostics.
    pub fn level(&self, window: &[i16]) -> f32 {
        rms(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn gate(threshold: f32) -> SilenceGate {
        SilenceGate::new(GateConfig {
            silence_threshold: threshold,
        })
    }

    #[test]
    fn silence_does_not_pass() {
        assert!(!gate(0.01).has_speech(&vec![0i16; 1600]));
    }

    #[test]
    fn loud_noise_passes() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let noise: Vec<i16> = (0..1600).map(|_| rng.gen_range(-20000..20000)).collect();
        assert!(gate(0.01).has_speech(&noise));
    }

    #[test]
    fn scaling_crosses_threshold_exactly_once() {
        // A fixed window scaled down in amplitude must flip from speech to
        // silence at the threshold boundary and stay there.
        let base: Vec<i16> = (0..1600)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / 160.0;
                (phase.sin() * 8192.0) as i16
            })
            .collect();

        let g = gate(0.05);
        let mut seen_silence = false;
        for step in (1..=20).rev() {
            let factor = step as f32 / 20.0;
            let scaled: Vec<i16> = base.iter().map(|&s| (s as f32 * factor) as i16).collect();
            let speech = g.has_speech(&scaled);
            if seen_silence {
                assert!(!speech, "gate reopened below threshold at factor {factor}");
            }
            if !speech {
                seen_silence = true;
            }
        }
        assert!(seen_silence, "gate never closed while scaling down");
    }

    #[test]
    fn level_matches_rms() {
        let window = vec![1000i16; 1600];
        let g = gate(0.01);
        assert!((g.level(&window) - rms(&window)).abs() < f32::EPSILON);
    }
}
