//! Interior-angle and through-centroid distance profiles of a contour.

use crate::contour::{BorderContour, ContourError};
use crate::geom;
use crate::profile::Profile;

/// Interior angle at every border index.
///
/// For index `i` the angle is measured between the border points `window`
/// steps behind and ahead (circular). The raw 3-point angle is in [0, 180];
/// whether the interior angle is that value or its reflex complement is
/// decided by testing the midpoint of the chord between the two window
/// endpoints against the enclosed region: inside means the raw angle opens
/// into the shape.
///
/// Fails if the contour is shorter than `2 * window + 1` points.
pub fn angle_profile(contour: &BorderContour, window: usize) -> Result<Profile, ContourError> {
    let needed = 2 * window + 1;
    if contour.len() < needed {
        return Err(ContourError::TooFewPoints {
            needed,
            got: contour.len(),
        });
    }
    let mut values = Vec::with_capacity(contour.len());
    for i in 0..contour.len() as i64 {
        let before = contour.point(i - window as i64);
        let after = contour.point(i + window as i64);
        let raw = geom::angle_deg(contour.point(i), before, after);
        let chord_mid = geom::midpoint(before, after);
        let angle = if contour.contains(chord_mid) {
            raw
        } else {
            360.0 - raw
        };
        values.push(angle);
    }
    Ok(Profile::new(values))
}

/// Index of the border point diametrically opposite `index` through the
/// centroid: the point whose angle `(point, centroid, candidate)` is closest
/// to 180 degrees.
pub fn opposite_border(contour: &BorderContour, index: usize) -> usize {
    let com = contour.centroid();
    let anchor = contour.point(index as i64);
    let mut best = 0;
    let mut best_diff = 180.0;
    for j in 0..contour.len() {
        let angle = geom::angle_deg(com, anchor, contour.point(j as i64));
        let diff = (180.0 - angle).abs();
        if diff < best_diff {
            best_diff = diff;
            best = j;
        }
    }
    best
}

/// Diameter profile: for every index, the distance to its opposite border
/// point through the centroid.
///
/// The profile minimum marks the narrowest diameter of the shape, the
/// maximum its longest; both serve as landmark fallbacks.
pub fn distance_profile(contour: &BorderContour) -> Profile {
    let mut values = Vec::with_capacity(contour.len());
    for i in 0..contour.len() {
        let j = opposite_border(contour, i);
        values.push(geom::distance(
            contour.point(i as i64),
            contour.point(j as i64),
        ));
    }
    Profile::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ellipse_contour, regular_polygon, spiked_circle};

    #[test]
    fn window_too_large_is_rejected() {
        let c = BorderContour::new(regular_polygon(10, 5.0)).unwrap();
        let err = angle_profile(&c, 5).unwrap_err();
        assert_eq!(err, ContourError::TooFewPoints { needed: 11, got: 10 });
    }

    #[test]
    fn regular_polygon_has_constant_interior_angle() {
        for n in [5usize, 8, 12, 36] {
            let c = BorderContour::new(regular_polygon(n, 10.0)).unwrap();
            let profile = angle_profile(&c, 1).unwrap();
            let expected = 180.0 - 360.0 / n as f64;
            for v in profile.values() {
                assert!(
                    (v - expected).abs() < 1e-6,
                    "n={} expected {} got {}",
                    n,
                    expected,
                    v
                );
            }
        }
    }

    #[test]
    fn concave_region_exceeds_180_degrees() {
        // A deep narrow spike leaves reflex angles at its flanks.
        let c = BorderContour::new(spiked_circle(180, 20.0, 0.25, 0.02, 0.6)).unwrap();
        let profile = angle_profile(&c, 5).unwrap();
        assert!(profile.max_value() > 180.0);
        assert!(profile.min_value() < 180.0);
    }

    #[test]
    fn opposite_border_of_regular_polygon_is_halfway() {
        let c = BorderContour::new(regular_polygon(36, 10.0)).unwrap();
        let j = opposite_border(&c, 0);
        assert_eq!(j, 18);
    }

    #[test]
    fn distance_profile_of_circle_is_diameter() {
        let c = BorderContour::new(regular_polygon(90, 10.0)).unwrap();
        let d = distance_profile(&c);
        for v in d.values() {
            assert!((v - 20.0).abs() < 0.1, "got {}", v);
        }
    }

    #[test]
    fn distance_profile_tracks_ellipse_axes() {
        let c = BorderContour::new(ellipse_contour(360, 20.0, 10.0)).unwrap();
        let d = distance_profile(&c);
        // Long axis at index 0, short axis a quarter of the way round.
        assert!((d.values()[0] - 40.0).abs() < 0.5);
        assert!((d.values()[90] - 20.0).abs() < 0.5);
        assert!(d.max_value() <= 40.0 + 0.5);
        assert!(d.min_value() >= 20.0 - 0.5);
    }
}
