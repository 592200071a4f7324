#![allow(dead_code)]

use std::f32::consts::PI;

pub const SR: u32 = 22050;
pub const HOP: usize = 512;
pub const WINDOW: usize = 2048;

pub fn silence(n: usize) -> Vec<f32> {
    vec![0.0; n]
}

pub fn gen_impulse(n: usize, position: usize, amp: f32) -> Vec<f32> {
    let mut out = vec![0.0f32; n];
    out[position] = amp;
    out
}

/// `count` sine bursts of `burst_secs`, the first at `first_secs`, one every
/// `period_secs`, in `total_secs` of otherwise silent signal.
pub fn gen_bursts(
    count: usize,
    first_secs: f32,
    period_secs: f32,
    burst_secs: f32,
    total_secs: f32,
    sr: u32,
) -> Vec<f32> {
    let mut out = vec![0.0f32; (total_secs * sr as f32) as usize];
    let burst_len = (burst_secs * sr as f32) as usize;
    for b in 0..count {
        let start = ((first_secs + b as f32 * period_secs) * sr as f32) as usize;
        for i in 0..burst_len {
            if start + i < out.len() {
                let phase = 2.0 * PI * 440.0 * i as f32 / sr as f32;
                out[start + i] = 0.8 * phase.sin();
            }
        }
    }
    out
}

/// Deterministic uniform noise in [-amp, amp].
pub fn gen_noise(n: usize, amp: f32, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            (unit * 2.0 - 1.0) * amp
        })
        .collect()
}

/// First frame whose analysis window contains sample `position`.
pub fn first_covering_frame(position: usize) -> usize {
    (position + 1).saturating_sub(WINDOW).div_ceil(HOP)
}
