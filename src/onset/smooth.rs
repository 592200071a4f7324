//! Gaussian smoothing of the onset envelope.

use super::strength::OnsetEnvelope;
use crate::error::{ensure_finite, OnsetError};

/// Kernel radius in standard deviations.
const TRUNCATE: f32 = 4.0;

/// Widest kernel radius accepted, in frames (about two minutes at the
/// default framing).
pub const MAX_KERNEL_RADIUS: f32 = 10_000.0;

/// Convolves the envelope with a normalized Gaussian of standard deviation
/// `sigma` frames. Edges are handled by half-sample symmetric reflection
/// (`d c b a | a b c d | d c b a`), so the output keeps the input length.
/// `sigma == 0` returns the envelope unchanged.
///
/// `sigma` must satisfy `TRUNCATE * sigma <= MAX_KERNEL_RADIUS`.
pub fn smooth(envelope: &OnsetEnvelope, sigma: f32) -> Result<OnsetEnvelope, OnsetError> {
    check_sigma(sigma)?;

    let values = envelope.values();
    if values.is_empty() || sigma == 0.0 {
        return Ok(envelope.clone());
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let n = values.len();

    let smoothed: Vec<f32> = (0..n as isize)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| w * values[reflect(i + k as isize - radius, n)])
                .sum::<f32>()
        })
        .collect();

    ensure_finite("smoothed envelope", &smoothed)?;
    Ok(envelope.with_values(smoothed))
}

pub(crate) fn check_sigma(sigma: f32) -> Result<(), OnsetError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(OnsetError::InvalidConfig(format!(
            "sigma must be a finite non-negative number, got {}",
            sigma
        )));
    }
    if TRUNCATE * sigma > MAX_KERNEL_RADIUS {
        return Err(OnsetError::InvalidConfig(format!(
            "sigma {} gives a kernel wider than {} frames",
            sigma, MAX_KERNEL_RADIUS
        )));
    }
    Ok(())
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f32 / sigma).powi(2)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    kernel
}

/// Maps an out-of-range index back into `0..n` by mirroring about the edges.
fn reflect(index: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = index.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(values: Vec<f32>) -> OnsetEnvelope {
        OnsetEnvelope::new(values, 512, 22050)
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 9);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        for k in 0..kernel.len() / 2 {
            assert!((kernel[k] - kernel[kernel.len() - 1 - k]).abs() < 1e-7);
        }
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
        // Kernel wider than the signal keeps bouncing
        assert_eq!(reflect(-3, 2), 1);
        assert_eq!(reflect(-5, 2), 0);
        assert_eq!(reflect(9, 3), 2);
    }

    #[test]
    fn test_preserves_length_and_metadata() {
        let env = envelope(vec![0.0, 1.0, 0.0, 5.0, 2.0]);
        let out = smooth(&env, 1.0).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.hop_length(), 512);
        assert_eq!(out.sample_rate(), 22050);
    }

    #[test]
    fn test_constant_signal_unchanged() {
        let env = envelope(vec![3.0; 12]);
        let out = smooth(&env, 1.0).unwrap();
        for &v in out.values() {
            assert!((v - 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut values = vec![0.0; 21];
        values[10] = 1.0;
        let out = smooth(&envelope(values), 1.0).unwrap();
        let v = out.values();
        assert!(v[10] > v[9] && v[9] > v[8]);
        assert!((v[9] - v[11]).abs() < 1e-7);
        assert!((v.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        // Neighbour ratio is exp(-0.5) for sigma = 1
        assert!((v[9] / v[10] - (-0.5f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn test_sigma_zero_is_identity() {
        let env = envelope(vec![1.0, 4.0, 2.0]);
        assert_eq!(smooth(&env, 0.0).unwrap(), env);
    }

    #[test]
    fn test_empty_envelope() {
        let out = smooth(&envelope(Vec::new()), 1.0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_frame_with_wide_kernel() {
        let out = smooth(&envelope(vec![2.0]), 3.0).unwrap();
        assert!((out.values()[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_negative_sigma() {
        assert!(smooth(&envelope(vec![1.0]), -1.0).is_err());
        assert!(smooth(&envelope(vec![1.0]), f32::NAN).is_err());
    }

    #[test]
    fn test_rejects_sigma_too_wide_to_allocate() {
        for sigma in [1e12, 1e30, f32::MAX] {
            assert!(matches!(
                smooth(&envelope(vec![1.0, 2.0]), sigma),
                Err(OnsetError::InvalidConfig(_))
            ));
        }
        // The largest accepted width still smooths
        let out = smooth(&envelope(vec![2.0; 3]), MAX_KERNEL_RADIUS / TRUNCATE).unwrap();
        assert!((out.values()[1] - 2.0).abs() < 1e-3);
    }
}
