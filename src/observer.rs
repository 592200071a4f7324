//! Per-invocation progress reporting.
//!
//! The pipeline never touches global logger state itself; callers pass an
//! observer for each run. [`LogObserver`] forwards to the `log` facade under
//! a caller-chosen label so concurrent runs stay distinguishable.

use std::fmt;

/// Pipeline stage that just produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    Strength,
    Smooth,
    Slope,
    Peaks,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clean => "signal cleaning",
            Stage::Strength => "onset strength",
            Stage::Smooth => "envelope smoothing",
            Stage::Slope => "rising-edge filter",
            Stage::Peaks => "peak picking",
        };
        f.write_str(name)
    }
}

pub trait PipelineObserver {
    /// `len` is the stage's output length (samples, frames or peaks).
    fn stage(&self, _stage: Stage, _len: usize) {}

    /// The waveform is shorter than one analysis window.
    fn insufficient_data(&self, _samples: usize, _window_length: usize) {}

    fn finished(&self, _count: usize) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Logs events tagged with a label, typically the input file name.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PipelineObserver for LogObserver {
    fn stage(&self, stage: Stage, len: usize) {
        log::debug!("[{}] {} -> {}", self.label, stage, len);
    }

    fn insufficient_data(&self, samples: usize, window_length: usize) {
        log::info!(
            "[{}] {} samples is shorter than one {}-sample window, no onsets",
            self.label,
            samples,
            window_length
        );
    }

    fn finished(&self, count: usize) {
        log::info!("[{}] Counted {} repetitions", self.label, count);
    }
}
