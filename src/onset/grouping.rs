//! Post-processing of onset times for reports.
//!
//! Neither function changes the repetition count; they give a coarser view
//! of where the repetitions start.

/// Merges onsets that sit close together.
///
/// Times are walked in order. A time joins the current group when it lies
/// within `threshold_secs` of any member; otherwise the group is closed and
/// replaced by its mean time.
pub fn group_onsets(times: &[f32], threshold_secs: f32) -> Vec<f32> {
    let mut grouped = Vec::new();
    let mut current: Vec<f32> = Vec::new();

    for &t in times {
        if current.is_empty() || current.iter().any(|&m| (t - m).abs() <= threshold_secs) {
            current.push(t);
        } else {
            grouped.push(mean(&current));
            current.clear();
            current.push(t);
        }
    }
    if !current.is_empty() {
        grouped.push(mean(&current));
    }

    grouped
}

/// Keeps an onset only if it comes at least `min_distance_secs` after the
/// previously kept one.
pub fn filter_by_distance(times: &[f32], min_distance_secs: f32) -> Vec<f32> {
    let mut kept: Vec<f32> = Vec::new();
    for &t in times {
        match kept.last() {
            Some(&last) if t - last < min_distance_secs => {}
            _ => kept.push(t),
        }
    }
    kept
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}
