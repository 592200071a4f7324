//! Error types for the onset pipeline.

use thiserror::Error;

/// Errors raised by the repetition-counting pipeline.
///
/// A recording too short to analyse is not an error: it yields an empty
/// envelope and a count of zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OnsetError {
    /// The waveform claims a sample rate of 0 Hz.
    #[error("invalid sample rate: must be greater than 0 Hz")]
    InvalidSampleRate,

    /// A configuration value lies outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The resampler could not convert the input to the analysis rate.
    #[error("resampling from {from}Hz to {to}Hz failed: {reason}")]
    Resample { from: u32, to: u32, reason: String },

    /// A NaN or infinite value reached the named stage.
    #[error("non-finite value in {stage} at index {index}")]
    NonFinite { stage: &'static str, index: usize },
}

/// Fails with [`OnsetError::NonFinite`] on the first NaN or infinity in `values`.
pub(crate) fn ensure_finite(stage: &'static str, values: &[f32]) -> Result<(), OnsetError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OnsetError::NonFinite { stage, index }),
        None => Ok(()),
    }
}
