//! Pipeline configuration, loadable from a TOML file.
//!
//! Every field has a default, so a file only needs to name the values it
//! changes:
//!
//! ```toml
//! [audio]
//! sample_rate = 44100
//!
//! [peaks]
//! wait = 20
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::OnsetError;
use crate::onset::smooth;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CounterConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub clean: CleanConfig,
    #[serde(default)]
    pub onset: OnsetConfig,
    #[serde(default)]
    pub peaks: PeakConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
}

/// Input normalisation ahead of the pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioConfig {
    /// Rate the pipeline runs at; input at any other rate is resampled
    /// first. Window, hop and every frame count assume this rate.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

/// Noise gate applied to raw samples.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CleanConfig {
    /// Gate threshold as a multiple of the whole-buffer RMS.
    #[serde(default = "default_rms_factor")]
    pub rms_factor: f32,
}

/// Framing and smoothing of the onset-strength envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnsetConfig {
    #[serde(default = "default_window_length")]
    pub window_length: usize,
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    /// Gaussian standard deviation, in frames.
    #[serde(default = "default_sigma")]
    pub sigma: f32,
    /// Subtract the envelope mean after estimation.
    #[serde(default)]
    pub detrend: bool,
}

/// Peak-picking windows, in frames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeakConfig {
    #[serde(default = "default_peak_window")]
    pub pre_max: usize,
    #[serde(default = "default_peak_window")]
    pub post_max: usize,
    #[serde(default = "default_peak_window")]
    pub pre_avg: usize,
    #[serde(default = "default_peak_window")]
    pub post_avg: usize,
    /// `delta = delta_factor * max(signal)`
    #[serde(default = "default_delta_factor")]
    pub delta_factor: f32,
    /// Refractory period between accepted peaks.
    #[serde(default = "default_wait")]
    pub wait: usize,
}

/// Post-processing of onset times for reporting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupingConfig {
    #[serde(default = "default_group_threshold")]
    pub group_threshold_secs: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            rms_factor: default_rms_factor(),
        }
    }
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            window_length: default_window_length(),
            hop_length: default_hop_length(),
            sigma: default_sigma(),
            detrend: false,
        }
    }
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            pre_max: default_peak_window(),
            post_max: default_peak_window(),
            pre_avg: default_peak_window(),
            post_avg: default_peak_window(),
            delta_factor: default_delta_factor(),
            wait: default_wait(),
        }
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            group_threshold_secs: default_group_threshold(),
            min_distance_secs: default_min_distance(),
        }
    }
}

fn default_sample_rate() -> u32 { 22050 }
fn default_rms_factor() -> f32 { 0.5 }
fn default_window_length() -> usize { 2048 }
fn default_hop_length() -> usize { 512 }
fn default_sigma() -> f32 { 1.0 }
fn default_peak_window() -> usize { 3 }
fn default_delta_factor() -> f32 { 0.2 }
fn default_wait() -> usize { 50 }
fn default_group_threshold() -> f32 { 0.3 }
fn default_min_distance() -> f32 { 0.5 }

impl CounterConfig {
    /// Checks every value against its domain.
    pub fn validate(&self) -> Result<(), OnsetError> {
        if self.audio.sample_rate == 0 {
            return Err(OnsetError::InvalidConfig(
                "audio.sample_rate must be greater than 0 Hz".to_string(),
            ));
        }
        if self.onset.window_length < 2 {
            return Err(OnsetError::InvalidConfig(format!(
                "window_length must be at least 2, got {}",
                self.onset.window_length
            )));
        }
        if self.onset.hop_length == 0 {
            return Err(OnsetError::InvalidConfig(
                "hop_length must be at least 1".to_string(),
            ));
        }
        non_negative("clean.rms_factor", self.clean.rms_factor)?;
        smooth::check_sigma(self.onset.sigma)?;
        non_negative("peaks.delta_factor", self.peaks.delta_factor)?;
        non_negative("grouping.group_threshold_secs", self.grouping.group_threshold_secs)?;
        non_negative("grouping.min_distance_secs", self.grouping.min_distance_secs)?;
        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), OnsetError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OnsetError::InvalidConfig(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}

/// Reads and parses a TOML configuration file.
pub fn load_config(path: &Path) -> Result<CounterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parses TOML text into a validated configuration.
pub fn parse_config(content: &str) -> Result<CounterConfig> {
    let config: CounterConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
