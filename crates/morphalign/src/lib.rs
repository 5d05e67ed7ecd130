//! morphalign — population-level morphological profile analysis and
//! landmark alignment for closed contours.
//!
//! Given a set of already-detected shape borders ("nuclei"), the pipeline:
//!
//! 1. **Profile** – derives a per-shape interior-angle profile and a
//!    through-centroid diameter profile.
//! 2. **Aggregate** – bins the profiles of the whole population on a shared
//!    0–100 normalized axis and reduces each bin to median and quartiles.
//! 3. **Locate** – finds the anatomical landmark on the consensus curve via
//!    a noise-tolerant local-minima search.
//! 4. **Align** – rescales the consensus landmark into every shape's own
//!    index space and corrects that shape's landmark tag.
//! 5. **Score** – measures each shape's deviation from the consensus and
//!    selects the most representative member.
//!
//! Outlier members are rejected against population medians before the
//! consensus is built. Acquisition, segmentation, rendering and export are
//! external collaborators: the crate consumes point sequences and returns
//! in-memory results.
//!
//! # Public API
//! [`Aligner`] is the primary entry point; [`AnalysisConfig`] tunes it. The
//! individual stages are exported for callers that need only part of the
//! pipeline.

mod align;
mod api;
mod config;
mod contour;
mod geom;
mod landmark;
mod pipeline;
mod population;
mod profile;
mod score;
mod stats;
#[cfg(test)]
pub(crate) mod test_utils;

pub use align::{correct_landmark, rescale_index, Alignment};
pub use api::Aligner;
pub use config::{AnalysisConfig, FilterConfig, LandmarkConfig, RefineConfig, ScoreConfig};
pub use contour::{BorderContour, ContourError, LANDMARK_OPPOSITE, LANDMARK_REFERENCE};
pub use landmark::{
    find_landmark, local_minima, maxima_above, minima_below, select_landmark,
    strict_local_maxima, strict_local_minima, LandmarkStrategy,
};
pub use pipeline::{
    analyze, build_members, median_curve_of, AnalysisError, AnalysisResult, ShapeInput,
    ShapeOutcome,
};
pub use population::aggregate::{EmptyAggregate, MedianCurve, ProfileAggregate};
pub use population::filter::{
    deviation_gate, filter_population, FilterStats, FAIL_AREA, FAIL_CONTOUR_LENGTH,
    FAIL_DEVIATION, FAIL_FERET, FAIL_PATH_LENGTH, FAIL_PERIMETER,
};
pub use population::{Measurements, Nucleus, Population};
pub use profile::{
    angle_profile, distance_profile, normalized_position, opposite_border, Profile,
};
pub use score::{best_match, difference, DifferenceMetric};
