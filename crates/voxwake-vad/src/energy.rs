/// Root-mean-square energy of a PCM window, normalized to [0, 1].
///
/// Samples are treated as full-scale at 32768, matching the recognizer's
/// float normalization, so a threshold chosen against normalized audio
/// applies directly.
pub fn rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let sum_squares: i64 = frame
        .iter()
        .map(|&sample| {
            let s = sample as i64;
            s * s
        })
        .sum();

    let mean_square = sum_squares as f64 / frame.len() as f64;
    (mean_square.sqrt() / 32768.0) as f32
}
