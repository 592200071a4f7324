//! Rising-edge filter over the smoothed envelope.

use super::strength::OnsetEnvelope;

/// Forward difference of the envelope with falling slopes clamped to zero.
///
/// `out[0]` is always 0; `out[i] = max(0, env[i] - env[i - 1])`.
pub fn rising_edges(envelope: &OnsetEnvelope) -> OnsetEnvelope {
    let values = envelope.values();
    let mut edges = Vec::with_capacity(values.len());
    if !values.is_empty() {
        edges.push(0.0);
        edges.extend(values.windows(2).map(|w| (w[1] - w[0]).max(0.0)));
    }
    envelope.with_values(edges)
}
