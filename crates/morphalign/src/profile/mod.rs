//! Per-shape profiles: one scalar per contour index, with circular
//! operations (interpolation, smoothing, rotation) and the 0-100 normalized
//! position mapping used to join profiles of differing raw lengths.

mod angle;

pub use angle::{angle_profile, distance_profile, opposite_border};

use crate::geom;

/// Normalized position of a contour index: `index / length * 100`.
pub fn normalized_position(index: usize, length: usize) -> f64 {
    index as f64 / length as f64 * 100.0
}

/// A derived per-index scalar curve over a closed contour.
///
/// Profiles are immutable once produced; every operation returns a new
/// profile. Indices wrap modulo the length.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    values: Vec<f64>,
}

impl Profile {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at a wrapped signed index.
    pub fn wrapped(&self, index: i64) -> f64 {
        self.values[index.rem_euclid(self.values.len() as i64) as usize]
    }

    /// Index of the smallest value (first occurrence; 0 for an empty profile).
    pub fn min_index(&self) -> usize {
        let mut best = 0;
        for (i, v) in self.values.iter().enumerate() {
            if *v < self.values[best] {
                best = i;
            }
        }
        best
    }

    /// Index of the largest value (first occurrence; 0 for an empty profile).
    pub fn max_index(&self) -> usize {
        let mut best = 0;
        for (i, v) in self.values.iter().enumerate() {
            if *v > self.values[best] {
                best = i;
            }
        }
        best
    }

    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Normalized position of every index, the x-axis key for aggregation.
    pub fn normalized_positions(&self) -> Vec<f64> {
        (0..self.values.len())
            .map(|i| normalized_position(i, self.values.len()))
            .collect()
    }

    /// Resample to `new_length` by circular linear interpolation.
    ///
    /// The fractional source index for new index `j` is `j * len / new_length`;
    /// the upper bounding index wraps to 0 at the seam so the interpolation is
    /// continuous across the start point. Degenerate input (empty profile or
    /// zero target length) yields an empty profile.
    pub fn interpolate(&self, new_length: usize) -> Profile {
        if self.values.is_empty() || new_length == 0 {
            return Profile::new(Vec::new());
        }
        let len = self.values.len();
        let ratio = len as f64 / new_length as f64;
        let mut out = Vec::with_capacity(new_length);
        for j in 0..new_length {
            let pos = j as f64 * ratio;
            let lo = (pos.floor() as usize).min(len - 1);
            let hi = if lo + 1 == len { 0 } else { lo + 1 };
            let frac = pos - lo as f64;
            out.push(self.values[lo] + (self.values[hi] - self.values[lo]) * frac);
        }
        Profile::new(out)
    }

    /// Circular moving average over `2 * window + 1` samples.
    pub fn smooth(&self, window: usize) -> Profile {
        if self.values.is_empty() || window == 0 {
            return self.clone();
        }
        let len = self.values.len() as i64;
        let half = window as i64;
        let mut out = Vec::with_capacity(self.values.len());
        for i in 0..len {
            let mut sum = 0.0;
            for d in -half..=half {
                sum += self.values[(i + d).rem_euclid(len) as usize];
            }
            out.push(sum / (2 * window + 1) as f64);
        }
        Profile::new(out)
    }

    /// Rotate so the sample at `start` becomes index 0.
    pub fn rotated(&self, start: i64) -> Profile {
        if self.values.is_empty() {
            return self.clone();
        }
        let len = self.values.len() as i64;
        let mut out = Vec::with_capacity(self.values.len());
        for i in 0..len {
            out.push(self.values[(i + start).rem_euclid(len) as usize]);
        }
        Profile::new(out)
    }

    /// Reverse the sample order.
    pub fn reversed(&self) -> Profile {
        Profile::new(self.values.iter().rev().copied().collect())
    }

    /// Polyline length of the profile plotted against normalized position,
    /// with the previous point initialized to the origin.
    ///
    /// A wobbly, noisy outline produces a long path; used as the
    /// "wobbliness" measurement by the population filter.
    pub fn path_length(&self) -> f64 {
        let len = self.values.len();
        let mut prev = [0.0, 0.0];
        let mut total = 0.0;
        for (i, v) in self.values.iter().enumerate() {
            let point = [normalized_position(i, len), *v];
            total += geom::distance(prev, point);
            prev = point;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn sine_profile(len: usize) -> Profile {
        Profile::new(
            (0..len)
                .map(|i| 180.0 + 30.0 * (TAU * i as f64 / len as f64).sin())
                .collect(),
        )
    }

    #[test]
    fn normalized_positions_span_0_to_100_exclusive() {
        let p = Profile::new(vec![0.0; 4]);
        let pos = p.normalized_positions();
        assert_eq!(pos, vec![0.0, 25.0, 50.0, 75.0]);
        assert!((normalized_position(99, 200) - 49.5).abs() < 1e-12);
    }

    #[test]
    fn interpolate_preserves_length_and_seam() {
        let p = Profile::new(vec![0.0, 1.0, 2.0, 3.0]);
        let up = p.interpolate(8);
        assert_eq!(up.len(), 8);
        // Index 7 sits halfway between the last and the first sample.
        assert!((up.values()[7] - 1.5).abs() < 1e-12);
        // Existing samples are preserved at even indices.
        for i in 0..4 {
            assert!((up.values()[2 * i] - p.values()[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn interpolate_roundtrip_recovers_smooth_profile() {
        let p = sine_profile(100);
        let back = p.interpolate(250).interpolate(100);
        assert_eq!(back.len(), 100);
        for (a, b) in p.values().iter().zip(back.values()) {
            approx::assert_abs_diff_eq!(*a, *b, epsilon = 0.05);
        }
    }

    #[test]
    fn interpolate_degenerate_inputs() {
        assert!(Profile::new(Vec::new()).interpolate(10).is_empty());
        assert!(sine_profile(10).interpolate(0).is_empty());
    }

    #[test]
    fn smooth_keeps_constant_profiles() {
        let p = Profile::new(vec![42.0; 12]);
        let s = p.smooth(3);
        for v in s.values() {
            assert!((v - 42.0).abs() < 1e-12);
        }
    }

    #[test]
    fn smooth_spreads_impulse_circularly() {
        let mut values = vec![0.0; 6];
        values[0] = 3.0;
        let s = Profile::new(values).smooth(1);
        // Window of 3: the impulse contributes to indices 5, 0, 1.
        assert!((s.values()[0] - 1.0).abs() < 1e-12);
        assert!((s.values()[1] - 1.0).abs() < 1e-12);
        assert!((s.values()[5] - 1.0).abs() < 1e-12);
        assert!((s.values()[3]).abs() < 1e-12);
    }

    #[test]
    fn rotated_moves_start_and_wraps() {
        let p = Profile::new(vec![10.0, 20.0, 30.0, 40.0]);
        let r = p.rotated(2);
        assert_eq!(r.values(), &[30.0, 40.0, 10.0, 20.0]);
        let r = p.rotated(-1);
        assert_eq!(r.values(), &[40.0, 10.0, 20.0, 30.0]);
        assert_eq!(p.rotated(4), p);
    }

    #[test]
    fn reversed_flips_order() {
        let p = Profile::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.reversed().values(), &[3.0, 2.0, 1.0]);
    }

    #[test]
    fn extrema_take_first_occurrence() {
        let p = Profile::new(vec![5.0, 1.0, 8.0, 1.0, 8.0]);
        assert_eq!(p.min_index(), 1);
        assert_eq!(p.max_index(), 2);
        assert!((p.min_value() - 1.0).abs() < 1e-12);
        assert!((p.max_value() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn path_length_of_flat_profile() {
        // First segment climbs from the origin to (0, 5), then three steps
        // of 25 along the position axis.
        let p = Profile::new(vec![5.0; 4]);
        assert!((p.path_length() - 80.0).abs() < 1e-12);
    }

    #[test]
    fn path_length_grows_with_noise() {
        let smooth = sine_profile(90);
        let noisy = Profile::new(
            smooth
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| v + if i % 2 == 0 { 8.0 } else { -8.0 })
                .collect(),
        );
        assert!(noisy.path_length() > smooth.path_length());
    }

    #[test]
    fn wrapped_indexing() {
        let p = Profile::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.wrapped(-1), 3.0);
        assert_eq!(p.wrapped(3), 1.0);
        assert_eq!(p.wrapped(-4), 3.0);
    }
}
