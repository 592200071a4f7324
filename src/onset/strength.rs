//! Spectral-flux onset strength.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;

use crate::error::{ensure_finite, OnsetError};

const COMPLEX_ZERO: Complex<f32> = Complex::new(0.0, 0.0);

/// Frame-rate onset strength, one value per analysis frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnsetEnvelope {
    values: Vec<f32>,
    hop_length: usize,
    sample_rate: u32,
}

impl OnsetEnvelope {
    pub(crate) fn new(values: Vec<f32>, hop_length: usize, sample_rate: u32) -> Self {
        Self {
            values,
            hop_length,
            sample_rate,
        }
    }

    /// Same framing, different values.
    pub(crate) fn with_values(&self, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), self.values.len());
        Self::new(values, self.hop_length, self.sample_rate)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Number of complete analysis frames that fit in `num_samples`.
pub fn frame_count(num_samples: usize, window_length: usize, hop_length: usize) -> usize {
    if num_samples < window_length || hop_length == 0 {
        return 0;
    }
    (num_samples - window_length) / hop_length + 1
}

/// Computes the spectral-flux envelope of `samples`.
///
/// Each frame of `window_length` samples is Hann-windowed and transformed;
/// its strength is the sum over bins of the positive magnitude increase
/// since the previous frame. The first frame has no predecessor and is 0.
/// With `detrend` the envelope mean is subtracted afterwards.
///
/// Input shorter than one window yields an empty envelope.
pub fn estimate(
    samples: &[f32],
    sample_rate: u32,
    window_length: usize,
    hop_length: usize,
    detrend: bool,
) -> Result<OnsetEnvelope, OnsetError> {
    if sample_rate == 0 {
        return Err(OnsetError::InvalidSampleRate);
    }
    if window_length < 2 || hop_length == 0 {
        return Err(OnsetError::InvalidConfig(format!(
            "cannot frame with window_length={} hop_length={}",
            window_length, hop_length
        )));
    }

    let num_frames = frame_count(samples.len(), window_length, hop_length);
    if num_frames == 0 {
        return Ok(OnsetEnvelope::new(Vec::new(), hop_length, sample_rate));
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window_length);
    let hann = hann_window(window_length);

    let num_bins = window_length / 2 + 1;
    let mut fft_buffer = vec![COMPLEX_ZERO; window_length];
    let mut prev_magnitudes = vec![0.0f32; num_bins];
    let mut flux_values = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_length;

        for (buf, (&s, &w)) in fft_buffer
            .iter_mut()
            .zip(samples[start..start + window_length].iter().zip(hann.iter()))
        {
            *buf = Complex::new(s * w, 0.0);
        }

        fft.process(&mut fft_buffer);

        let mut flux = 0.0f32;
        for (bin, (c, prev)) in fft_buffer[..num_bins]
            .iter()
            .zip(prev_magnitudes.iter_mut())
            .enumerate()
        {
            let mag = c.norm();
            if !mag.is_finite() {
                return Err(OnsetError::NonFinite {
                    stage: "magnitude spectrum",
                    index: frame_idx * num_bins + bin,
                });
            }
            let diff = mag - *prev;
            if diff > 0.0 {
                flux += diff;
            }
            *prev = mag;
        }

        flux_values.push(if frame_idx == 0 { 0.0 } else { flux });
    }

    if detrend {
        let mean = flux_values.iter().sum::<f32>() / flux_values.len() as f32;
        for v in flux_values.iter_mut() {
            *v -= mean;
        }
    }

    ensure_finite("onset strength", &flux_values)?;

    Ok(OnsetEnvelope::new(flux_values, hop_length, sample_rate))
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
