/// Start time of analysis frame `frame`, in seconds.
pub fn frame_to_time(frame: usize, hop_length: usize, sample_rate: u32) -> f32 {
    (frame as f64 * hop_length as f64 / sample_rate as f64) as f32
}

/// Samples between the start of a peak frame and the event that raised it.
///
/// Frames are not centred, so an event enters a frame's window well before
/// it reaches the middle. The flux peaks once the event sits near the window
/// centre, and the rising edge of the smoothed envelope fires about one hop
/// ahead of that peak.
pub fn onset_lag(window_length: usize, hop_length: usize) -> usize {
    window_length / 2 + hop_length
}

/// Time of the event behind a peak at `frame`, in seconds.
///
/// This is [`frame_to_time`] shifted by [`onset_lag`].
pub fn onset_time(frame: usize, window_length: usize, hop_length: usize, sample_rate: u32) -> f32 {
    let position = frame as f64 * hop_length as f64 + onset_lag(window_length, hop_length) as f64;
    (position / sample_rate as f64) as f32
}
