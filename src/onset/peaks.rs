//! Peak picking over the rising-edge signal.

use serde::Serialize;

use super::time::onset_time;
use crate::config::PeakConfig;

/// Accepted peak frames, strictly increasing and at least `wait + 1` apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeakSet {
    frames: Vec<usize>,
}

impl PeakSet {
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Event time behind each peak, in seconds (see [`onset_time`]).
    pub fn times(&self, window_length: usize, hop_length: usize, sample_rate: u32) -> Vec<f32> {
        self.frames
            .iter()
            .map(|&f| onset_time(f, window_length, hop_length, sample_rate))
            .collect()
    }
}

/// Selects peaks from `signal`, scanning left to right.
///
/// Index `i` is accepted when all of the following hold:
/// - `signal[i] > 0`
/// - `signal[i] == max(signal[i - pre_max ..= i + post_max])`
/// - `signal[i] >= mean(signal[i - pre_avg .. i + post_avg]) + delta`, with
///   `delta = delta_factor * max(signal)` taken once over the whole signal
/// - no peak was accepted in the previous `wait` frames
///
/// Windows are clipped to the signal bounds. A signal with no positive value
/// has no peaks.
pub fn pick(signal: &[f32], config: &PeakConfig) -> PeakSet {
    let n = signal.len();
    let max_value = signal.iter().copied().fold(0.0f32, f32::max);
    if n == 0 || max_value <= 0.0 {
        return PeakSet::default();
    }

    let delta = config.delta_factor * max_value;
    log::trace!("Peak picking over {} frames, delta={:.6}", n, delta);

    let mut frames = Vec::new();
    let mut i = 0;
    while i < n {
        let value = signal[i];
        if value > 0.0
            && is_local_max(signal, i, config)
            && value >= local_mean(signal, i, config) + delta
        {
            frames.push(i);
            i += config.wait + 1;
        } else {
            i += 1;
        }
    }

    PeakSet { frames }
}

fn is_local_max(signal: &[f32], i: usize, config: &PeakConfig) -> bool {
    let start = i.saturating_sub(config.pre_max);
    let end = (i + config.post_max + 1).min(signal.len());
    let window_max = signal[start..end].iter().copied().fold(f32::MIN, f32::max);
    signal[i] == window_max
}

fn local_mean(signal: &[f32], i: usize, config: &PeakConfig) -> f32 {
    let start = i.saturating_sub(config.pre_avg);
    // Half-open window; always include `i` itself
    let end = (i + config.post_avg).clamp(i + 1, signal.len());
    let window = &signal[start..end];
    window.iter().sum::<f32>() / window.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(wait: usize) -> PeakConfig {
        PeakConfig {
            wait,
            ..PeakConfig::default()
        }
    }

    #[test]
    fn test_single_spike() {
        let mut signal = vec![0.0; 40];
        signal[12] = 1.0;
        assert_eq!(pick(&signal, &config(50)).frames(), &[12]);
    }

    #[test]
    fn test_all_zero_signal_has_no_peaks() {
        assert!(pick(&[0.0; 200], &config(50)).is_empty());
        assert!(pick(&[0.0; 200], &config(0)).is_empty());
        assert!(pick(&[], &config(50)).is_empty());
    }

    #[test]
    fn test_refractory_period_suppresses_close_peaks() {
        let mut signal = vec![0.0; 100];
        signal[10] = 1.0;
        signal[30] = 1.0;
        signal[61] = 1.0;
        let peaks = pick(&signal, &config(50));
        // 30 is inside the refractory window of 10; 61 is the first frame after it
        assert_eq!(peaks.frames(), &[10, 61]);
    }

    #[test]
    fn test_refractory_boundary_is_exclusive() {
        let mut signal = vec![0.0; 100];
        signal[10] = 1.0;
        signal[60] = 1.0;
        assert_eq!(pick(&signal, &config(50)).frames(), &[10]);
    }

    #[test]
    fn test_delta_rejects_small_bumps() {
        let mut signal = vec![0.0; 200];
        signal[20] = 1.0;
        signal[100] = 0.25;
        signal[180] = 0.1;
        // delta = 0.2, local mean of an isolated bump is bump / 6
        let peaks = pick(&signal, &config(10));
        assert_eq!(peaks.frames(), &[20, 100]);
    }

    #[test]
    fn test_delta_is_global_not_windowed() {
        // A loud opening followed by quieter repetitions
        let mut signal = vec![0.0; 300];
        signal[10] = 10.0;
        for &f in &[80, 150, 220] {
            signal[f] = 1.5;
        }
        // delta = 2.0 from the global max, so the quiet bumps fall short
        assert_eq!(pick(&signal, &config(10)).frames(), &[10]);
    }

    #[test]
    fn test_plateau_resolves_to_earliest_index() {
        let mut signal = vec![0.0; 60];
        signal[20] = 1.0;
        signal[21] = 1.0;
        signal[22] = 1.0;
        assert_eq!(pick(&signal, &config(5)).frames(), &[20]);
    }

    #[test]
    fn test_non_maximum_neighbor_rejected() {
        let signal = vec![0.0, 0.5, 1.0, 0.5, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(pick(&signal, &config(0)).frames(), &[2]);
    }

    #[test]
    fn test_peaks_at_signal_edges() {
        let signal = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(pick(&signal, &config(2)).frames(), &[0, 9]);
    }

    #[test]
    fn test_wait_zero_allows_adjacent_distinct_peaks() {
        let signal = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let cfg = PeakConfig {
            pre_max: 1,
            post_max: 1,
            wait: 0,
            ..PeakConfig::default()
        };
        assert_eq!(pick(&signal, &cfg).frames(), &[3, 7]);
    }

    #[test]
    fn test_separation_invariant_on_dense_signal() {
        let signal: Vec<f32> = (0..1000)
            .map(|i| ((i as f32 * 0.9).sin() + 1.0) * ((i % 13) as f32))
            .collect();
        for wait in [0, 1, 7, 50] {
            let peaks = pick(&signal, &config(wait));
            for pair in peaks.frames().windows(2) {
                assert!(pair[1] - pair[0] > wait, "wait={} pair={:?}", wait, pair);
            }
        }
    }

    #[test]
    fn test_times() {
        let mut signal = vec![0.0; 100];
        signal[43] = 1.0;
        let peaks = pick(&signal, &config(50));
        let times = peaks.times(2048, 512, 22050);
        assert_eq!(times.len(), 1);
        assert!((times[0] - (43.0 * 512.0 + 1536.0) / 22050.0).abs() < 1e-6);
    }
}
