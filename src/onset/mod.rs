//! Onset detection stages, applied in this order:
//!
//! 1. [`clean`] gates low-level noise against the buffer RMS
//! 2. [`strength`] computes the spectral-flux envelope
//! 3. [`smooth`] low-passes it with a Gaussian
//! 4. [`slope`] keeps the rising edges
//! 5. [`peaks`] picks onsets under threshold and refractory constraints
//!
//! [`time`] maps frames to seconds and [`grouping`] post-processes onset
//! times for reporting.

pub mod clean;
pub mod grouping;
pub mod peaks;
pub mod slope;
pub mod smooth;
pub mod strength;
pub mod time;

pub use peaks::PeakSet;
pub use strength::OnsetEnvelope;
