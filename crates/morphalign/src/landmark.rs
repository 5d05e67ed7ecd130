//! Landmark location on circular profiles: local-extremum searches and
//! bounded best-candidate selection with a logged fallback.

use crate::config::LandmarkConfig;
use crate::profile::Profile;

/// Violations tolerated across both neighbor chains by [`local_minima`].
const MINIMA_TOLERANCE: i32 = 2;

/// How the consensus landmark is located on a median curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkStrategy {
    /// Lowest in-bounds local minimum of the angle curve (sharp indentation
    /// or protrusion tip).
    AngleMinimum,
    /// Highest in-bounds local maximum above the reflex cutoff (concave
    /// landmark region).
    AngleMaximum,
    /// Fixed fraction of the curve length; for near-round shapes with no
    /// stable extremum.
    FixedFraction { fraction: f64 },
}

/// Noise-tolerant circular local-minima search.
///
/// For each index two chains of `window` neighbors extend backward and
/// forward. Walking outward, each neighbor must be at least as large as the
/// one before it (the first is compared against the candidate itself); a
/// step where either chain decreases costs one tolerance point, and
/// candidates exceeding [`MINIMA_TOLERANCE`] are dropped.
///
/// The tolerance admits a small cluster of indices around a sharp minimum;
/// callers disambiguate by value (see [`select_landmark`]). Windows of 1 or
/// 2 cannot exhaust the tolerance and accept every index.
pub fn local_minima(profile: &Profile, window: usize) -> Vec<usize> {
    let len = profile.len();
    if len == 0 || window == 0 {
        return Vec::new();
    }
    let mut minima = Vec::new();
    for i in 0..len as i64 {
        let mut errors = MINIMA_TOLERANCE;
        let mut ok = true;
        for step in 1..=window as i64 {
            let prev = profile.wrapped(i - step);
            let next = profile.wrapped(i + step);
            let prev_inner = profile.wrapped(i - step + 1);
            let next_inner = profile.wrapped(i + step - 1);
            if prev < prev_inner || next < next_inner {
                errors -= 1;
            }
            if errors < 0 {
                ok = false;
                break;
            }
        }
        if ok {
            minima.push(i as usize);
        }
    }
    minima
}

/// Strict circular local minima: every outward step along both chains must
/// increase strictly. A sharp unique minimum yields exactly one index.
pub fn strict_local_minima(profile: &Profile, window: usize) -> Vec<usize> {
    extrema(profile, window, |outer, inner| outer <= inner)
}

/// Strict circular local maxima, the dual of [`strict_local_minima`].
pub fn strict_local_maxima(profile: &Profile, window: usize) -> Vec<usize> {
    extrema(profile, window, |outer, inner| outer >= inner)
}

/// Strict local minima whose value is below `threshold`.
pub fn minima_below(profile: &Profile, window: usize, threshold: f64) -> Vec<usize> {
    strict_local_minima(profile, window)
        .into_iter()
        .filter(|&i| profile.values()[i] < threshold)
        .collect()
}

/// Strict local maxima whose value is above `threshold`.
pub fn maxima_above(profile: &Profile, window: usize, threshold: f64) -> Vec<usize> {
    strict_local_maxima(profile, window)
        .into_iter()
        .filter(|&i| profile.values()[i] > threshold)
        .collect()
}

fn extrema(profile: &Profile, window: usize, violates: fn(f64, f64) -> bool) -> Vec<usize> {
    let len = profile.len();
    if len == 0 || window == 0 {
        return Vec::new();
    }
    let mut found = Vec::new();
    'candidates: for i in 0..len as i64 {
        for step in 1..=window as i64 {
            let prev_inner = profile.wrapped(i - step + 1);
            let next_inner = profile.wrapped(i + step - 1);
            if violates(profile.wrapped(i - step), prev_inner)
                || violates(profile.wrapped(i + step), next_inner)
            {
                continue 'candidates;
            }
        }
        found.push(i as usize);
    }
    found
}

/// Pick the lowest-valued candidate strictly inside `(lower, upper)`.
///
/// When no candidate qualifies the documented `fallback` index is returned
/// and a diagnostic is logged; this is a recoverable condition, not an
/// error.
pub fn select_landmark(
    candidates: &[usize],
    profile: &Profile,
    lower: usize,
    upper: usize,
    fallback: usize,
) -> usize {
    select_extreme(candidates, profile, lower, upper, fallback, false)
}

fn select_extreme(
    candidates: &[usize],
    profile: &Profile,
    lower: usize,
    upper: usize,
    fallback: usize,
    prefer_max: bool,
) -> usize {
    let mut best: Option<usize> = None;
    for &idx in candidates {
        if idx <= lower || idx >= upper || idx >= profile.len() {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => {
                if prefer_max {
                    profile.values()[idx] > profile.values()[b]
                } else {
                    profile.values()[idx] < profile.values()[b]
                }
            }
        };
        if better {
            best = Some(idx);
        }
    }
    match best {
        Some(idx) => idx,
        None => {
            tracing::warn!(
                "no landmark candidate inside ({}, {}); using fallback index {}",
                lower,
                upper,
                fallback
            );
            fallback
        }
    }
}

/// Locate the landmark on a curve according to the configured strategy.
///
/// Search bounds are the configured normalized positions scaled to the curve
/// length; `fallback` is used when the strategy finds no in-bounds
/// candidate.
pub fn find_landmark(curve: &Profile, config: &LandmarkConfig, fallback: usize) -> usize {
    let len = curve.len();
    if len == 0 {
        return 0;
    }
    let lower = (config.search_lower_pos / 100.0 * len as f64) as usize;
    let upper = (config.search_upper_pos / 100.0 * len as f64) as usize;
    match config.strategy {
        LandmarkStrategy::AngleMinimum => {
            let candidates = local_minima(curve, config.minima_window);
            select_landmark(&candidates, curve, lower, upper, fallback)
        }
        LandmarkStrategy::AngleMaximum => {
            let candidates = maxima_above(curve, config.minima_window, config.maxima_threshold);
            select_extreme(&candidates, curve, lower, upper, fallback, true)
        }
        LandmarkStrategy::FixedFraction { fraction } => {
            ((len as f64 * fraction).round() as i64).rem_euclid(len as i64) as usize
        }
    }
}
