//! Analysis configuration: plain-old-data structs with concrete defaults.

use crate::landmark::LandmarkStrategy;
use crate::score::DifferenceMetric;

/// Top-level analysis configuration.
///
/// Build with [`Default`] and override individual fields as needed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    /// Half-window for the interior-angle calculation: the angle at index `i`
    /// is measured between the border points `angle_window` steps behind and
    /// ahead. Contours shorter than `2 * angle_window + 1` points are
    /// rejected.
    pub angle_window: usize,
    /// Bin width of the population profile aggregate, in normalized position
    /// units across [0, 100).
    pub profile_increment: f64,
    /// Consensus landmark location controls.
    pub landmark: LandmarkConfig,
    /// Population outlier rejection controls.
    pub filter: FilterConfig,
    /// Difference scoring controls.
    pub score: ScoreConfig,
    /// Consensus refinement loop controls.
    pub refine: RefineConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            angle_window: 23,
            profile_increment: 0.5,
            landmark: LandmarkConfig::default(),
            filter: FilterConfig::default(),
            score: ScoreConfig::default(),
            refine: RefineConfig::default(),
        }
    }
}

/// Controls for locating the consensus landmark on a median curve.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LandmarkConfig {
    /// How the landmark is located on the curve.
    pub strategy: LandmarkStrategy,
    /// Neighbor-chain length of the local-extremum searches.
    pub minima_window: usize,
    /// Cutoff for the [`LandmarkStrategy::AngleMaximum`] strategy: only
    /// maxima above this value qualify (degrees for angle curves).
    pub maxima_threshold: f64,
    /// Lower search bound as a normalized position; candidates at or below
    /// it are skipped.
    pub search_lower_pos: f64,
    /// Upper search bound as a normalized position; candidates at or above
    /// it are skipped.
    pub search_upper_pos: f64,
    /// Fallback landmark position as a fraction of the curve length, used
    /// when no candidate qualifies.
    pub fallback_fraction: f64,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            strategy: LandmarkStrategy::AngleMinimum,
            minima_window: 5,
            maxima_threshold: 180.0,
            search_lower_pos: 20.0,
            search_upper_pos: 60.0,
            fallback_fraction: 0.5,
        }
    }
}

/// Median-threshold outlier rejection controls.
///
/// A factor `t` bounds a two-sided metric to `[median / t, median * t]`;
/// path length is bounded from above only and feret from below only.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterConfig {
    /// Two-sided bound factor for the enclosed area.
    pub max_area_from_median: f64,
    /// Two-sided bound factor for the perimeter.
    pub max_perimeter_from_median: f64,
    /// Two-sided bound factor for the contour point count.
    pub max_length_from_median: f64,
    /// Upper bound factor for the angle-profile path length (wobbliness).
    pub max_wobbliness_from_median: f64,
    /// Lower bound factor for the max feret diameter: members with
    /// `feret < median / factor` are rejected.
    pub min_feret_from_median: f64,
    /// Also reject members whose difference-to-median score exceeds
    /// `median score * max_deviation_from_median`. Off by default.
    pub deviation_gate: bool,
    /// Bound factor for the deviation gate.
    pub max_deviation_from_median: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_area_from_median: 1.5,
            max_perimeter_from_median: 1.5,
            max_length_from_median: 1.5,
            max_wobbliness_from_median: 1.2,
            min_feret_from_median: 1.5,
            deviation_gate: false,
            max_deviation_from_median: 2.0,
        }
    }
}

/// Difference scoring controls.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreConfig {
    /// Reduction applied to pointwise profile differences.
    pub metric: DifferenceMetric,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            metric: DifferenceMetric::SumSquares,
        }
    }
}

/// Consensus refinement loop controls.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RefineConfig {
    /// Maximum aggregate-locate-align-score passes. The loop also stops as
    /// soon as the population's total difference score stops improving; a
    /// cap of 1 disables refinement entirely.
    pub max_passes: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self { max_passes: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let config = AnalysisConfig::default();
        assert_eq!(config.angle_window, 23);
        assert_eq!(config.profile_increment, 0.5);
        assert_eq!(config.landmark.strategy, LandmarkStrategy::AngleMinimum);
        assert_eq!(config.landmark.minima_window, 5);
        assert_eq!(config.landmark.maxima_threshold, 180.0);
        assert_eq!(config.landmark.search_lower_pos, 20.0);
        assert_eq!(config.landmark.search_upper_pos, 60.0);
        assert_eq!(config.landmark.fallback_fraction, 0.5);
        assert_eq!(config.filter.max_area_from_median, 1.5);
        assert_eq!(config.filter.max_perimeter_from_median, 1.5);
        assert_eq!(config.filter.max_length_from_median, 1.5);
        assert_eq!(config.filter.max_wobbliness_from_median, 1.2);
        assert_eq!(config.filter.min_feret_from_median, 1.5);
        assert!(!config.filter.deviation_gate);
        assert_eq!(config.filter.max_deviation_from_median, 2.0);
        assert_eq!(config.score.metric, DifferenceMetric::SumSquares);
        assert_eq!(config.refine.max_passes, 10);
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = AnalysisConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
