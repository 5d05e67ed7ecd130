//! Deterministic synthetic contour builders shared by the unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Regular N-gon of the given circumradius, centered on the origin, starting
/// on the positive x axis and winding counter-clockwise.
pub(crate) fn regular_polygon(n: usize, radius: f64) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            [radius * theta.cos(), radius * theta.sin()]
        })
        .collect()
}

/// Axis-aligned ellipse with semi-axes `a` (x) and `b` (y); index 0 lies on
/// the long axis when `a > b`.
pub(crate) fn ellipse_contour(n: usize, a: f64, b: f64) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            [a * theta.cos(), b * theta.sin()]
        })
        .collect()
}

/// Circle with a narrow radial spike.
///
/// The spike is centered at `at` (fraction of the way around) and has
/// angular half-width `width` (fraction of the circle). Positive `depth`
/// cuts inward by `depth * radius` at the center; negative `depth` bulges
/// outward.
pub(crate) fn spiked_circle(
    n: usize,
    radius: f64,
    at: f64,
    width: f64,
    depth: f64,
) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            let f = i as f64 / n as f64;
            let d = (f - at).abs();
            let d = d.min(1.0 - d);
            let r = if d < width {
                radius * (1.0 - depth * (1.0 - d / width))
            } else {
                radius
            };
            let theta = std::f64::consts::TAU * f;
            [r * theta.cos(), r * theta.sin()]
        })
        .collect()
}

/// Circle with seeded per-point radial jitter in `[-noise, noise]`.
pub(crate) fn jittered_circle(n: usize, radius: f64, noise: f64, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            let r = radius + rng.gen_range(-noise..=noise);
            [r * theta.cos(), r * theta.sin()]
        })
        .collect()
}
