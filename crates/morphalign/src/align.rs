//! Consensus alignment: pull each shape's individually-detected landmark
//! toward the population's consensus position.

use crate::contour::{BorderContour, ContourError, LANDMARK_OPPOSITE, LANDMARK_REFERENCE};
use crate::profile::opposite_border;

/// Outcome of one landmark correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Consensus landmark index rescaled into the shape's own index space.
    pub rescaled: usize,
    /// Signed distance the individual landmark sat from the rescaled
    /// consensus, in border indices.
    pub offset: i64,
    /// The corrected reference landmark index.
    pub corrected: usize,
    /// The new opposite landmark index, diametrically across the centroid
    /// from `corrected`.
    pub opposite: usize,
}

/// Rescale an index from one circular length into another: round to the
/// nearest integer and wrap.
pub fn rescale_index(index: usize, from_len: usize, to_len: usize) -> usize {
    if from_len == 0 || to_len == 0 {
        return 0;
    }
    let scaled = (index as f64 / from_len as f64 * to_len as f64).round() as i64;
    scaled.rem_euclid(to_len as i64) as usize
}

/// Correct a shape's reference landmark against the population consensus.
///
/// `consensus_index` is the landmark found on the median curve of length
/// `curve_len`. The consensus is rescaled into the contour's index space,
/// the shape's own landmark offset from it is measured, and the reference
/// tag is moved by that offset onto the consensus position. The opposite
/// tag is re-derived from the corrected reference.
///
/// Applying the correction again with the same consensus is a fixed point:
/// the measured offset is zero and the tags do not move.
///
/// Fails only when the reference landmark was never set on the contour.
pub fn correct_landmark(
    contour: &mut BorderContour,
    consensus_index: usize,
    curve_len: usize,
) -> Result<Alignment, ContourError> {
    let individual = contour.landmark(LANDMARK_REFERENCE)?;
    let rescaled = rescale_index(consensus_index, curve_len, contour.len());
    let offset = individual as i64 - rescaled as i64;
    let corrected = contour.wrap(individual as i64 - offset);
    contour.set_landmark(LANDMARK_REFERENCE, corrected as i64);
    let opposite = opposite_border(contour, corrected);
    contour.set_landmark(LANDMARK_OPPOSITE, opposite as i64);
    tracing::debug!(
        individual,
        rescaled,
        offset,
        corrected,
        "corrected reference landmark"
    );
    Ok(Alignment {
        rescaled,
        offset,
        corrected,
        opposite,
    })
}
