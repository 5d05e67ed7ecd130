//! Sorted-rank percentile statistics used by the aggregator and the
//! population filter.

/// Percentile by sorted rank: index `round(len * p / 100)`, clamped to the
/// last element. Returns 0.0 for an empty slice.
pub(crate) fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let idx = (sorted.len() as f64 * p / 100.0).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

pub(crate) fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}
