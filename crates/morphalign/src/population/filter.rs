//! Median-threshold outlier rejection with a per-criterion failure bitmask.

use crate::config::FilterConfig;
use crate::population::{Nucleus, Population};
use crate::stats;

/// Enclosed area outside the median bounds.
pub const FAIL_AREA: u32 = 1;
/// Perimeter outside the median bounds.
pub const FAIL_PERIMETER: u32 = 2;
/// Angle-profile path length above the wobbliness bound.
pub const FAIL_PATH_LENGTH: u32 = 4;
/// Border point count outside the median bounds.
pub const FAIL_CONTOUR_LENGTH: u32 = 8;
/// Max feret diameter below the median bound.
pub const FAIL_FERET: u32 = 16;
/// Difference-to-median score above the deviation bound.
pub const FAIL_DEVIATION: u32 = 32;

/// Counts from one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterStats {
    pub examined: usize,
    pub rejected: usize,
    pub area: usize,
    pub perimeter: usize,
    pub path_length: usize,
    pub contour_length: usize,
    pub feret: usize,
}

/// Reject members whose scalar measurements deviate too far from the
/// population medians.
///
/// Every median is computed once over the members present at entry; a
/// member violating several criteria accumulates every matching bit before
/// it is moved to the rejected set. Rejected members are not re-examined.
pub fn filter_population(population: &mut Population, config: &FilterConfig) -> FilterStats {
    let mut stats = FilterStats {
        examined: population.len(),
        ..FilterStats::default()
    };
    if population.is_empty() {
        return stats;
    }

    let median_area = population.median_of(|n| n.measurements().area);
    let median_perimeter = population.median_of(|n| n.measurements().perimeter);
    let median_path_length = population.median_of(|n| n.measurements().path_length);
    let median_length = population.median_of(|n| n.measurements().contour_length as f64);
    let median_feret = population.median_of(|n| n.measurements().feret);

    let min_area = median_area / config.max_area_from_median;
    let max_area = median_area * config.max_area_from_median;
    let min_perimeter = median_perimeter / config.max_perimeter_from_median;
    let max_perimeter = median_perimeter * config.max_perimeter_from_median;
    let max_path_length = median_path_length * config.max_wobbliness_from_median;
    let min_length = median_length / config.max_length_from_median;
    let max_length = median_length * config.max_length_from_median;
    let min_feret = median_feret / config.min_feret_from_median;

    for member in population.members_mut() {
        let m = *member.measurements();
        if m.area < min_area || m.area > max_area {
            member.update_failure_code(FAIL_AREA);
            stats.area += 1;
        }
        if m.perimeter < min_perimeter || m.perimeter > max_perimeter {
            member.update_failure_code(FAIL_PERIMETER);
            stats.perimeter += 1;
        }
        // Wobbliness detector: only values too high mark a failure.
        if m.path_length > max_path_length {
            member.update_failure_code(FAIL_PATH_LENGTH);
            stats.path_length += 1;
        }
        let length = m.contour_length as f64;
        if length < min_length || length > max_length {
            member.update_failure_code(FAIL_CONTOUR_LENGTH);
            stats.contour_length += 1;
        }
        // Feret is one-sided the other way: short shapes are fragments.
        if m.feret < min_feret {
            member.update_failure_code(FAIL_FERET);
            stats.feret += 1;
        }
    }

    stats.rejected = population.evict_failed();
    tracing::info!(
        examined = stats.examined,
        rejected = stats.rejected,
        area = stats.area,
        perimeter = stats.perimeter,
        path_length = stats.path_length,
        contour_length = stats.contour_length,
        feret = stats.feret,
        "population filter pass"
    );
    stats
}

/// Optional second gate: reject members whose difference-to-median score
/// exceeds `median score * factor`. Returns how many were rejected.
///
/// Only members that have been scored participate; the median is taken over
/// their scores once.
pub fn deviation_gate(population: &mut Population, factor: f64) -> usize {
    let scores: Vec<f64> = population
        .members()
        .iter()
        .filter_map(Nucleus::score)
        .collect();
    if scores.is_empty() {
        return 0;
    }
    let max_score = stats::median(&scores) * factor;
    for member in population.members_mut() {
        if let Some(score) = member.score() {
            if score > max_score {
                member.update_failure_code(FAIL_DEVIATION);
            }
        }
    }
    let rejected = population.evict_failed();
    if rejected > 0 {
        tracing::info!(rejected, max_score, "deviation gate pass");
    }
    rejected
}
