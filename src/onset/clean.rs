//! RMS noise gate.

/// Zeroes every sample whose magnitude falls below `rms_factor` times the
/// RMS of the whole buffer.
///
/// An all-zero buffer has an RMS (and threshold) of 0, so nothing is below
/// it and the input passes through unchanged.
pub fn clean(samples: &[f32], rms_factor: f32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let threshold = rms_factor * rms(samples);
    log::trace!("Noise gate threshold {:.6} over {} samples", threshold, samples.len());

    samples
        .iter()
        .map(|&s| if s.abs() < threshold { 0.0 } else { s })
        .collect()
}

/// Root mean square of `samples`, 0 for an empty buffer.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}
