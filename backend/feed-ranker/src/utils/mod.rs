// Utility functions for feed-ranker

/// Inverse time distance between a post and the reference time.
///
/// `1 / (reference_time - timestamp + 1)`. When the denominator would be zero
/// or negative (post dated at or after `reference_time + 1`) it is clamped to 1,
/// so future-dated posts count as maximally recent.
pub fn recency_factor(reference_time: i64, timestamp: i64) -> f64 {
    let denominator = reference_time.saturating_sub(timestamp).saturating_add(1);
    if denominator <= 0 {
        1.0
    } else {
        1.0 / denominator as f64
    }
}
