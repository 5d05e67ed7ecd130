//! Population members and the container holding them through an analysis
//! run.

pub mod aggregate;
pub mod filter;

use crate::contour::{BorderContour, ContourError, LANDMARK_OPPOSITE, LANDMARK_REFERENCE};
use crate::profile::{angle_profile, distance_profile, opposite_border, Profile};
use crate::stats;

/// Scalar shape measurements taken once at member construction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Measurements {
    /// Enclosed area (shoelace, absolute).
    pub area: f64,
    /// Closed border polyline length.
    pub perimeter: f64,
    /// Maximum pairwise border point distance.
    pub feret: f64,
    /// Minimum through-centroid diameter.
    pub min_diameter: f64,
    /// Path length of the angle profile against normalized position; high
    /// values mark a wobbly outline.
    pub path_length: f64,
    /// Border point count.
    pub contour_length: usize,
}

/// One population member: a contour plus its derived profiles, scalar
/// measurements, filter state and difference score.
///
/// Profiles and measurements are fixed at construction. The only field
/// rewritten afterwards is the contour's landmark map (by the alignment
/// pass) plus the failure code and score bookkeeping.
#[derive(Debug, Clone)]
pub struct Nucleus {
    id: String,
    source: Option<String>,
    contour: BorderContour,
    angle: Profile,
    diameters: Profile,
    measurements: Measurements,
    failure_code: u32,
    score: Option<f64>,
}

impl Nucleus {
    /// Build a member from a detected border.
    ///
    /// Computes the angle and diameter profiles and the scalar
    /// measurements, and seeds the reference landmark at the far end of the
    /// longest through-centroid diameter (the opposite tag at its antipode).
    pub fn new(
        id: impl Into<String>,
        points: Vec<[f64; 2]>,
        source: Option<String>,
        angle_window: usize,
    ) -> Result<Self, ContourError> {
        let mut contour = BorderContour::new(points)?;
        let angle = angle_profile(&contour, angle_window)?;
        let diameters = distance_profile(&contour);
        let reference = diameters.max_index();
        contour.set_landmark(LANDMARK_REFERENCE, reference as i64);
        contour.set_landmark(
            LANDMARK_OPPOSITE,
            opposite_border(&contour, reference) as i64,
        );
        let measurements = Measurements {
            area: contour.area(),
            perimeter: contour.perimeter(),
            feret: contour.max_feret(),
            min_diameter: diameters.min_value(),
            path_length: angle.path_length(),
            contour_length: contour.len(),
        };
        Ok(Self {
            id: id.into(),
            source,
            contour,
            angle,
            diameters,
            measurements,
            failure_code: 0,
            score: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn contour(&self) -> &BorderContour {
        &self.contour
    }

    /// Mutable contour access for the alignment pass.
    pub fn contour_mut(&mut self) -> &mut BorderContour {
        &mut self.contour
    }

    pub fn angle_profile(&self) -> &Profile {
        &self.angle
    }

    pub fn diameter_profile(&self) -> &Profile {
        &self.diameters
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Bitmask of violated filter criteria; 0 means the member passed.
    pub fn failure_code(&self) -> u32 {
        self.failure_code
    }

    pub fn update_failure_code(&mut self, criterion: u32) {
        self.failure_code |= criterion;
    }

    pub fn passed(&self) -> bool {
        self.failure_code == 0
    }

    /// Difference-to-median score from the most recent scoring pass.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = Some(score);
    }
}

/// The set of members under analysis plus the members rejected so far.
///
/// Rejected members keep their failure code and are never re-evaluated.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Nucleus>,
    rejected: Vec<Nucleus>,
}

impl Population {
    pub fn new(members: Vec<Nucleus>) -> Self {
        Self {
            members,
            rejected: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Nucleus] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Nucleus] {
        &mut self.members
    }

    pub fn rejected(&self) -> &[Nucleus] {
        &self.rejected
    }

    /// Population median of a scalar over the current members.
    pub fn median_of(&self, metric: impl Fn(&Nucleus) -> f64) -> f64 {
        let values: Vec<f64> = self.members.iter().map(metric).collect();
        stats::median(&values)
    }

    /// Move every member with a non-zero failure code to the rejected set,
    /// preserving order. Returns how many were moved.
    pub fn evict_failed(&mut self) -> usize {
        let before = self.members.len();
        let mut kept = Vec::with_capacity(before);
        for member in self.members.drain(..) {
            if member.passed() {
                kept.push(member);
            } else {
                self.rejected.push(member);
            }
        }
        self.members = kept;
        before - self.members.len()
    }
}
