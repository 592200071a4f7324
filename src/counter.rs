//! Repetition counting: the full onset pipeline behind one call.

use serde::Serialize;
use std::borrow::Cow;

use crate::audio::{resample, Waveform};
use crate::config::CounterConfig;
use crate::error::{ensure_finite, OnsetError};
use crate::observer::{NullObserver, PipelineObserver, Stage};
use crate::onset::{clean, grouping, peaks, slope, smooth, strength, PeakSet};

/// Every intermediate buffer of one pipeline run.
///
/// This is what a plotting front end needs to draw the cleaned waveform,
/// the envelopes and the detected onset markers. `sample_rate` is the
/// analysis rate, which is also the rate of `cleaned`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineTrace {
    pub sample_rate: u32,
    pub hop_length: usize,
    pub cleaned: Vec<f32>,
    pub envelope: Vec<f32>,
    pub smoothed: Vec<f32>,
    pub rising_edges: Vec<f32>,
    pub peaks: PeakSet,
    pub peak_times: Vec<f32>,
}

impl PipelineTrace {
    pub fn count(&self) -> usize {
        self.peaks.len()
    }
}

/// Runs the onset pipeline with a fixed configuration.
///
/// Holds no per-run state, so one counter can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RepetitionCounter {
    config: CounterConfig,
}

impl RepetitionCounter {
    pub fn new(config: CounterConfig) -> Result<Self, OnsetError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Number of onsets in `samples`.
    pub fn count(&self, samples: &[f32], sample_rate: u32) -> Result<usize, OnsetError> {
        self.count_observed(samples, sample_rate, &NullObserver)
    }

    pub fn count_observed(
        &self,
        samples: &[f32],
        sample_rate: u32,
        observer: &dyn PipelineObserver,
    ) -> Result<usize, OnsetError> {
        Ok(self.trace(samples, sample_rate, observer)?.count())
    }

    pub fn count_waveform(&self, waveform: &Waveform) -> Result<usize, OnsetError> {
        self.count(waveform.samples(), waveform.sample_rate())
    }

    /// Runs every stage and keeps the intermediate buffers.
    ///
    /// Input at a rate other than `config.audio.sample_rate` is resampled
    /// first, so a recording counts the same whatever rate it was stored at.
    pub fn trace(
        &self,
        samples: &[f32],
        sample_rate: u32,
        observer: &dyn PipelineObserver,
    ) -> Result<PipelineTrace, OnsetError> {
        if sample_rate == 0 {
            return Err(OnsetError::InvalidSampleRate);
        }
        ensure_finite("waveform", samples)?;

        let analysis_rate = self.config.audio.sample_rate;
        let samples: Cow<'_, [f32]> = if sample_rate == analysis_rate {
            Cow::Borrowed(samples)
        } else {
            Cow::Owned(resample(samples, sample_rate, analysis_rate)?)
        };
        let sample_rate = analysis_rate;

        let onset = &self.config.onset;

        let cleaned = clean::clean(&samples, self.config.clean.rms_factor);
        observer.stage(Stage::Clean, cleaned.len());

        if cleaned.len() < onset.window_length {
            observer.insufficient_data(cleaned.len(), onset.window_length);
        }
        let envelope = strength::estimate(
            &cleaned,
            sample_rate,
            onset.window_length,
            onset.hop_length,
            onset.detrend,
        )?;
        observer.stage(Stage::Strength, envelope.len());

        let smoothed = smooth::smooth(&envelope, onset.sigma)?;
        observer.stage(Stage::Smooth, smoothed.len());

        let edges = slope::rising_edges(&smoothed);
        observer.stage(Stage::Slope, edges.len());

        let peak_set = peaks::pick(edges.values(), &self.config.peaks);
        observer.stage(Stage::Peaks, peak_set.len());
        observer.finished(peak_set.len());

        let peak_times = peak_set.times(onset.window_length, onset.hop_length, sample_rate);

        Ok(PipelineTrace {
            sample_rate,
            hop_length: onset.hop_length,
            cleaned,
            envelope: envelope.into_values(),
            smoothed: smoothed.into_values(),
            rising_edges: edges.into_values(),
            peaks: peak_set,
            peak_times,
        })
    }

    /// Onset times merged with the configured grouping threshold.
    pub fn grouped_onsets(&self, trace: &PipelineTrace) -> Vec<f32> {
        grouping::group_onsets(&trace.peak_times, self.config.grouping.group_threshold_secs)
    }

    /// Onset times thinned to the configured minimum distance.
    pub fn spaced_onsets(&self, trace: &PipelineTrace) -> Vec<f32> {
        grouping::filter_by_distance(&trace.peak_times, self.config.grouping.min_distance_secs)
    }
}

/// Counts repetitions in a mono waveform with the default configuration.
///
/// A recording shorter than one analysis window counts as 0.
///
/// # Errors
///
/// [`OnsetError::InvalidSampleRate`] for a 0 Hz rate and
/// [`OnsetError::NonFinite`] when a NaN or infinity is found in the input or
/// produced by the spectral stages.
pub fn count_repetitions(samples: &[f32], sample_rate: u32) -> Result<usize, OnsetError> {
    RepetitionCounter::default().count(samples, sample_rate)
}
