//! Stage orchestration: build members, filter outliers, then iterate
//! aggregate → locate → align → score until the population's total
//! difference score stops improving.

mod result;

pub use result::{AnalysisResult, ShapeOutcome};

use crate::align;
use crate::config::AnalysisConfig;
use crate::contour::ContourError;
use crate::landmark;
use crate::population::aggregate::{EmptyAggregate, MedianCurve, ProfileAggregate};
use crate::population::filter;
use crate::population::{Nucleus, Population};
use crate::profile::Profile;
use crate::score;

/// One detected shape handed to the analysis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeInput {
    pub id: String,
    /// Identity of the image the shape was detected in.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    /// Ordered closed border; the first and last points are adjacent.
    pub points: Vec<[f64; 2]>,
}

/// Fatal analysis failures.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A contour could not be turned into a member.
    MalformedContour { id: String, source: ContourError },
    /// No members supplied, or none survived filtering.
    EmptyPopulation,
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MalformedContour { id, source } => {
                write!(f, "malformed contour '{}': {}", id, source)
            }
            AnalysisError::EmptyPopulation => write!(f, "population has no members"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::MalformedContour { source, .. } => Some(source),
            AnalysisError::EmptyPopulation => None,
        }
    }
}

impl From<EmptyAggregate> for AnalysisError {
    fn from(_: EmptyAggregate) -> Self {
        AnalysisError::EmptyPopulation
    }
}

/// Build the population members from raw inputs.
///
/// Any malformed contour aborts the run: a population with a broken member
/// is a caller error, not a recoverable condition.
pub fn build_members(
    inputs: Vec<ShapeInput>,
    angle_window: usize,
) -> Result<Vec<Nucleus>, AnalysisError> {
    let mut members = Vec::with_capacity(inputs.len());
    for input in inputs {
        let member = Nucleus::new(&input.id, input.points, input.source, angle_window)
            .map_err(|source| AnalysisError::MalformedContour {
                id: input.id,
                source,
            })?;
        members.push(member);
    }
    Ok(members)
}

/// Aggregate the members' angle profiles, each rotated by its accumulated
/// alignment shift, and reduce to a median curve.
fn consensus_curve(
    population: &Population,
    shifts: &[i64],
    increment: f64,
) -> Result<MedianCurve, EmptyAggregate> {
    let mut aggregate = ProfileAggregate::new(increment);
    for (member, shift) in population.members().iter().zip(shifts) {
        let aligned = member.angle_profile().rotated(*shift);
        aggregate.add(&aligned.normalized_positions(), aligned.values());
    }
    aggregate.reduce()
}

/// Run the full analysis over a set of detected shapes.
pub fn analyze(
    inputs: Vec<ShapeInput>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if inputs.is_empty() {
        return Err(AnalysisError::EmptyPopulation);
    }
    let members = build_members(inputs, config.angle_window)?;
    let mut population = Population::new(members);

    filter::filter_population(&mut population, &config.filter);
    if population.is_empty() {
        return Err(AnalysisError::EmptyPopulation);
    }

    // Refinement loop. Each pass rebuilds the consensus from the profiles
    // rotated by the correction offsets of the passes before it; a pass
    // whose total score does not improve on the previous one is discarded
    // and the loop stops.
    let mut shifts = vec![0i64; population.len()];
    let max_passes = config.refine.max_passes.max(1);
    let mut accepted: Option<(MedianCurve, usize)> = None;
    let mut best_total = f64::INFINITY;
    let mut passes = 0;

    for pass in 1..=max_passes {
        let curve = consensus_curve(&population, &shifts, config.profile_increment)?;
        let median = curve.median_profile();
        let fallback = fallback_index(median.len(), config.landmark.fallback_fraction);
        let consensus = landmark::find_landmark(&median, &config.landmark, fallback);

        let scores: Vec<f64> = population
            .members()
            .iter()
            .zip(&shifts)
            .map(|(member, shift)| {
                let aligned = member.angle_profile().rotated(*shift);
                score::difference(&aligned, &median, config.score.metric)
            })
            .collect();
        let total: f64 = scores.iter().sum();
        tracing::info!(pass, total, consensus, "consensus pass");

        if total >= best_total {
            tracing::debug!(pass, "score stopped improving, keeping previous pass");
            break;
        }
        best_total = total;
        passes = pass;

        for ((member, shift), member_score) in population
            .members_mut()
            .iter_mut()
            .zip(shifts.iter_mut())
            .zip(scores)
        {
            member.set_score(member_score);
            match align::correct_landmark(member.contour_mut(), consensus, median.len()) {
                Ok(alignment) => *shift += alignment.offset,
                Err(err) => {
                    // The reference tag is seeded at construction, so this
                    // is unreachable for members built by this pipeline.
                    tracing::warn!(id = member.id(), %err, "skipping landmark correction");
                }
            }
        }
        accepted = Some((curve, consensus));
    }

    // The first pass always improves on infinity.
    let (median_curve, consensus_landmark) =
        accepted.ok_or(AnalysisError::EmptyPopulation)?;

    if config.filter.deviation_gate {
        filter::deviation_gate(&mut population, config.filter.max_deviation_from_median);
        if population.is_empty() {
            return Err(AnalysisError::EmptyPopulation);
        }
    }

    let member_scores: Vec<f64> = population
        .members()
        .iter()
        .map(|m| m.score().unwrap_or(f64::INFINITY))
        .collect();
    let representative_id = score::best_match(&member_scores)
        .map(|i| population.members()[i].id().to_string());

    let mut shapes: Vec<ShapeOutcome> = population
        .members()
        .iter()
        .map(|m| ShapeOutcome::from_member(m, true))
        .collect();
    shapes.extend(
        population
            .rejected()
            .iter()
            .map(|m| ShapeOutcome::from_member(m, false)),
    );

    tracing::info!(
        members = population.len(),
        rejected = population.rejected().len(),
        passes,
        representative = representative_id.as_deref().unwrap_or("-"),
        "analysis complete"
    );

    Ok(AnalysisResult {
        shapes,
        median_curve,
        consensus_landmark,
        representative_id,
        passes,
    })
}

/// Fallback landmark index: a fixed fraction of the curve length.
fn fallback_index(len: usize, fraction: f64) -> usize {
    if len == 0 {
        return 0;
    }
    ((len as f64 * fraction).round() as i64).rem_euclid(len as i64) as usize
}

/// Aggregate the raw profiles of already-built members into a median curve,
/// without landmark work. Used by callers that only need the consensus
/// table.
pub fn median_curve_of(
    members: &[Nucleus],
    increment: f64,
) -> Result<MedianCurve, AnalysisError> {
    let mut aggregate = ProfileAggregate::new(increment);
    for member in members {
        let profile: &Profile = member.angle_profile();
        aggregate.add(&profile.normalized_positions(), profile.values());
    }
    Ok(aggregate.reduce()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{jittered_circle, regular_polygon};

    fn circle_inputs(count: usize, points: usize) -> Vec<ShapeInput> {
        (0..count)
            .map(|i| ShapeInput {
                id: format!("c{}", i),
                source: Some("plate1.tif".to_string()),
                // Per-point jitter small enough that the zigzag does not
                // push the noisy perimeters outside the filter band.
                points: if i == 0 {
                    regular_polygon(points, 50.0)
                } else {
                    jittered_circle(points, 50.0, 0.4, i as u64)
                },
            })
            .collect()
    }

    #[test]
    fn empty_input_is_fatal() {
        let err = analyze(Vec::new(), &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyPopulation);
    }

    #[test]
    fn malformed_contour_aborts_with_id() {
        let inputs = vec![ShapeInput {
            id: "broken".to_string(),
            source: None,
            points: regular_polygon(10, 5.0),
        }];
        let err = analyze(inputs, &AnalysisConfig::default()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedContour {
                id: "broken".to_string(),
                source: ContourError::TooFewPoints { needed: 47, got: 10 },
            }
        );
    }

    #[test]
    fn near_circular_population_end_to_end() {
        let result = analyze(circle_inputs(10, 360), &AnalysisConfig::default()).unwrap();
        // Every bin of the consensus curve is populated at increment 0.5.
        assert_eq!(result.median_curve.len(), 200);
        assert_eq!(result.median_curve.populated_bins(), 200);
        // The noise-free circle deviates least from the consensus.
        assert_eq!(result.representative_id.as_deref(), Some("c0"));
        assert_eq!(result.shapes.len(), 10);
        assert!(result.passes >= 1);
        for shape in result.passing() {
            assert!(shape.score.is_some());
            let landmark = shape.landmark.unwrap();
            assert!(landmark < 360);
            // Raw-frame correction pins every member to the same rescaled
            // consensus position.
            assert_eq!(
                landmark,
                crate::align::rescale_index(result.consensus_landmark, 200, 360)
            );
        }
    }

    #[test]
    fn refinement_cap_of_one_runs_a_single_pass() {
        let mut config = AnalysisConfig::default();
        config.refine.max_passes = 1;
        let result = analyze(circle_inputs(6, 360), &config).unwrap();
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn median_curve_of_skips_landmark_work() {
        let members = build_members(circle_inputs(5, 360), 23).unwrap();
        let curve = median_curve_of(&members, 0.5).unwrap();
        assert_eq!(curve.len(), 200);
        // Near-circular shapes keep the consensus close to a flat 180.
        let median = curve.median_profile();
        assert!(median.min_value() > 150.0);
        assert!(median.max_value() < 210.0);
    }
}
