//! Audio input: the waveform value type, the container decoder that
//! produces it and the resampler that brings it to the analysis rate.

pub mod decode;
pub mod resample;
pub mod waveform;

pub use decode::{decode_bytes, decode_file, DecodeError};
pub use resample::resample;
pub use waveform::Waveform;
