//! Serializable analysis outputs.

use crate::contour::{LANDMARK_OPPOSITE, LANDMARK_REFERENCE};
use crate::population::aggregate::MedianCurve;
use crate::population::{Measurements, Nucleus};

/// Per-shape outcome of an analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeOutcome {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// False when the member was moved to the rejected set.
    pub passed: bool,
    /// Bitmask of violated filter criteria; 0 when `passed`.
    pub failure_code: u32,
    /// Corrected reference landmark index into the shape's border.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<usize>,
    /// Opposite landmark index, across the centroid from the reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opposite: Option<usize>,
    /// Difference-to-median score; absent for members rejected before
    /// scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub measurements: Measurements,
}

impl ShapeOutcome {
    pub(crate) fn from_member(member: &Nucleus, passed: bool) -> Self {
        Self {
            id: member.id().to_string(),
            source: member.source().map(str::to_string),
            passed,
            failure_code: member.failure_code(),
            landmark: member.contour().landmark(LANDMARK_REFERENCE).ok(),
            opposite: member.contour().landmark(LANDMARK_OPPOSITE).ok(),
            score: member.score(),
            measurements: *member.measurements(),
        }
    }
}

/// Full output of one population analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    /// Passing members first, in input order, then the rejected members.
    pub shapes: Vec<ShapeOutcome>,
    /// Consensus curve of the final accepted pass.
    pub median_curve: MedianCurve,
    /// Consensus landmark index on the median curve.
    pub consensus_landmark: usize,
    /// Member with the lowest difference-to-median score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative_id: Option<String>,
    /// Refinement passes accepted before the score stopped improving.
    pub passes: usize,
}

impl AnalysisResult {
    /// Outcomes of the members that survived filtering.
    pub fn passing(&self) -> impl Iterator<Item = &ShapeOutcome> {
        self.shapes.iter().filter(|s| s.passed)
    }

    /// Outcomes of the rejected members.
    pub fn rejected(&self) -> impl Iterator<Item = &ShapeOutcome> {
        self.shapes.iter().filter(|s| !s.passed)
    }
}
