//! Sample-rate conversion to the analysis rate.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::OnsetError;

const SINC_LEN: usize = 256;

/// Resamples mono `samples` from `from_rate` to `to_rate` with a windowed
/// sinc interpolator.
///
/// The output is aligned with the input (the filter delay is removed) and
/// holds `round(len * to_rate / from_rate)` samples. Equal rates return a
/// copy of the input.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, OnsetError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(OnsetError::InvalidSampleRate);
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let failed = |reason: String| OnsetError::Resample {
        from: from_rate,
        to: to_rate,
        reason,
    };

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let expected = (samples.len() as f64 * ratio).round() as usize;

    // Trailing zeros flush the last real samples through the filter
    let mut input = Vec::with_capacity(samples.len() + SINC_LEN);
    input.extend_from_slice(samples);
    input.resize(samples.len() + SINC_LEN, 0.0);

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, input.len(), 1)
        .map_err(|e| failed(e.to_string()))?;
    let input = vec![input];
    let output = resampler
        .process(&input, None)
        .map_err(|e| failed(e.to_string()))?;

    let delay = resampler.output_delay();
    let mut out: Vec<f32> = output
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .skip(delay)
        .take(expected)
        .collect();
    out.resize(expected, 0.0);

    log::debug!(
        "Resampled {} samples at {}Hz to {} samples at {}Hz",
        samples.len(),
        from_rate,
        out.len(),
        to_rate
    );
    Ok(out)
}
