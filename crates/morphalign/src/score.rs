//! Deviation of an individual profile from a reference curve.

use crate::profile::Profile;

/// Reduction applied to the pointwise differences.
///
/// Neither variant normalizes by profile length: scores from profiles of
/// different lengths are comparable only after interpolation to a common
/// length, which [`difference`] performs internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceMetric {
    /// Sum of absolute pointwise differences.
    SumAbs,
    /// Sum of squared pointwise differences.
    SumSquares,
}

/// Score an individual profile against a reference.
///
/// The reference is interpolated to the individual's length when the
/// lengths differ; the pointwise differences are then reduced with the
/// chosen metric. Lower is closer; 0.0 for an empty individual.
pub fn difference(individual: &Profile, reference: &Profile, metric: DifferenceMetric) -> f64 {
    if individual.is_empty() || reference.is_empty() {
        return 0.0;
    }
    let matched;
    let reference = if reference.len() == individual.len() {
        reference
    } else {
        matched = reference.interpolate(individual.len());
        &matched
    };
    let mut total = 0.0;
    for (a, b) in individual.values().iter().zip(reference.values()) {
        let d = a - b;
        total += match metric {
            DifferenceMetric::SumAbs => d.abs(),
            DifferenceMetric::SumSquares => d * d,
        };
    }
    total
}

/// Index of the lowest score; the "most representative" member.
pub fn best_match(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, s) in scores.iter().enumerate() {
        if !s.is_finite() {
            continue;
        }
        match best {
            Some(b) if scores[b] <= *s => {}
            _ => best = Some(i),
        }
    }
    best
}
