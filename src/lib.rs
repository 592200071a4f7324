//! # chantcount
//!
//! Counts repeated phrases (chant repetitions, drills, call-and-response) in
//! a recording by detecting sudden rises in spectral energy.
//!
//! ```no_run
//! use chantcount::count_repetitions;
//!
//! let samples: Vec<f32> = vec![]; // mono, nominally in [-1.0, 1.0]
//! let repetitions = count_repetitions(&samples, 22050)?;
//! println!("{} repetitions", repetitions);
//! # Ok::<(), chantcount::OnsetError>(())
//! ```
//!
//! Input is first resampled to the analysis rate (22050 Hz by default). The
//! pipeline is then: noise gate → spectral-flux envelope → Gaussian smoothing
//! → rising edges → peak picking. Each stage is a pure function over its
//! input buffer; see [`onset`] for the stages and [`RepetitionCounter`] for
//! custom configuration and intermediate buffers.

#![warn(clippy::all)]

pub mod audio;
pub mod config;
pub mod counter;
pub mod error;
pub mod observer;
pub mod onset;

pub use audio::{decode_bytes, decode_file, DecodeError, Waveform};
pub use config::CounterConfig;
pub use counter::{count_repetitions, PipelineTrace, RepetitionCounter};
pub use error::OnsetError;
pub use observer::{LogObserver, NullObserver, PipelineObserver, Stage};
pub use onset::{OnsetEnvelope, PeakSet};
