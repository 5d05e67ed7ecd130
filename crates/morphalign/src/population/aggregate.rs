//! Population profile aggregation: binning normalized profiles into a
//! shared accumulator and reducing each bin to median and quartiles.

use crate::profile::Profile;
use crate::stats;

/// Raised when a reduction is attempted on an aggregate with no samples in
/// any bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyAggregate;

impl std::fmt::Display for EmptyAggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "profile aggregate contains no samples")
    }
}

impl std::error::Error for EmptyAggregate {}

/// Per-run accumulator of profile samples keyed by normalized-position bin.
///
/// The bin domain is [0, 100) stepped by the increment. Constructed fresh
/// for every analysis run; partial aggregates built in parallel can be
/// combined with [`merge`](ProfileAggregate::merge) before reduction.
#[derive(Debug, Clone)]
pub struct ProfileAggregate {
    increment: f64,
    bins: Vec<Vec<f64>>,
}

impl ProfileAggregate {
    /// Create an empty aggregate with `round(100 / increment)` bins.
    pub fn new(increment: f64) -> Self {
        assert!(
            increment > 0.0 && increment < 100.0,
            "profile increment must be in (0, 100)"
        );
        let count = (100.0 / increment).round() as usize;
        Self {
            increment,
            bins: vec![Vec::new(); count],
        }
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Samples collected so far at a bin.
    pub fn samples(&self, bin: usize) -> &[f64] {
        &self.bins[bin]
    }

    pub fn is_entirely_empty(&self) -> bool {
        self.bins.iter().all(Vec::is_empty)
    }

    /// Contribute one member's profile to the aggregate.
    ///
    /// A `(position, value)` pair lands in bin `b` when
    /// `b < position < b + increment`. Membership is strictly open on both
    /// edges, so a position exactly on a bin boundary is not counted; this
    /// matches the historical binning and is kept deliberately.
    pub fn add(&mut self, positions: &[f64], values: &[f64]) {
        debug_assert_eq!(positions.len(), values.len());
        for (bin, samples) in self.bins.iter_mut().enumerate() {
            let lower = bin as f64 * self.increment;
            let upper = lower + self.increment;
            for (position, value) in positions.iter().zip(values) {
                if *position > lower && *position < upper {
                    samples.push(*value);
                }
            }
        }
    }

    /// Fold another aggregate's samples into this one.
    ///
    /// Both aggregates must have been built with the same increment.
    pub fn merge(&mut self, other: &ProfileAggregate) {
        assert_eq!(self.bins.len(), other.bins.len(), "increment mismatch");
        for (mine, theirs) in self.bins.iter_mut().zip(&other.bins) {
            mine.extend_from_slice(theirs);
        }
    }

    /// Reduce every bin to its median and quartiles, producing a
    /// [`MedianCurve`] with gaps repaired.
    ///
    /// Empty bins in the first increment of the domain copy the next bin's
    /// statistics and empty bins in the last increment copy the previous
    /// bin's; any other empty bin keeps zero-filled statistics and is
    /// flagged with a warning (a known limitation, kept as-is).
    pub fn reduce(&self) -> Result<MedianCurve, EmptyAggregate> {
        if self.is_entirely_empty() {
            return Err(EmptyAggregate);
        }
        let count = self.bins.len();
        let mut curve = MedianCurve {
            positions: (0..count).map(|b| b as f64 * self.increment).collect(),
            medians: vec![0.0; count],
            q10: vec![0.0; count],
            q25: vec![0.0; count],
            q75: vec![0.0; count],
            q90: vec![0.0; count],
            counts: vec![0; count],
        };
        for (bin, samples) in self.bins.iter().enumerate() {
            if samples.is_empty() {
                continue;
            }
            curve.medians[bin] = stats::median(samples);
            curve.q10[bin] = stats::percentile(samples, 10.0);
            curve.q25[bin] = stats::percentile(samples, 25.0);
            curve.q75[bin] = stats::percentile(samples, 75.0);
            curve.q90[bin] = stats::percentile(samples, 90.0);
            curve.counts[bin] = samples.len();
        }
        // Gap repair runs forward over the arrays in place, as the
        // historical code did: a leading gap reads the (still unrepaired)
        // next bin, a trailing gap reads the already-repaired previous bin.
        for bin in 0..count {
            if curve.counts[bin] > 0 {
                continue;
            }
            let position = curve.positions[bin];
            let replacement = if position < 1.0 {
                bin + 1
            } else if position > 99.0 {
                bin - 1
            } else {
                tracing::warn!(
                    bin,
                    position,
                    "empty interior bin left with zero statistics"
                );
                continue;
            };
            if replacement >= count {
                continue;
            }
            curve.medians[bin] = curve.medians[replacement];
            curve.q10[bin] = curve.q10[replacement];
            curve.q25[bin] = curve.q25[replacement];
            curve.q75[bin] = curve.q75[replacement];
            curve.q90[bin] = curve.q90[replacement];
            tracing::debug!(bin, replacement, "repaired empty edge bin");
        }
        Ok(curve)
    }
}

/// Consensus curve of a population: per-bin median and quartile statistics
/// of the aggregated normalized profiles.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MedianCurve {
    /// Normalized position of every bin's lower edge.
    pub positions: Vec<f64>,
    /// Per-bin median sample value.
    pub medians: Vec<f64>,
    /// Per-bin 10th percentile.
    pub q10: Vec<f64>,
    /// Per-bin lower quartile.
    pub q25: Vec<f64>,
    /// Per-bin upper quartile.
    pub q75: Vec<f64>,
    /// Per-bin 90th percentile.
    pub q90: Vec<f64>,
    /// Samples contributed to each bin; 0 marks a repaired gap.
    pub counts: Vec<usize>,
}

impl MedianCurve {
    pub fn len(&self) -> usize {
        self.medians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medians.is_empty()
    }

    /// Bins that received at least one sample.
    pub fn populated_bins(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// The median column as a circular profile, for landmark search and
    /// difference scoring.
    pub fn median_profile(&self) -> Profile {
        Profile::new(self.medians.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    fn aggregate_of(profiles: &[Profile], increment: f64) -> ProfileAggregate {
        let mut agg = ProfileAggregate::new(increment);
        for p in profiles {
            agg.add(&p.normalized_positions(), p.values());
        }
        agg
    }

    #[test]
    fn bin_count_follows_increment() {
        assert_eq!(ProfileAggregate::new(0.5).bin_count(), 200);
        assert_eq!(ProfileAggregate::new(1.0).bin_count(), 100);
        assert_eq!(ProfileAggregate::new(2.5).bin_count(), 40);
    }

    #[test]
    fn bin_membership_is_strictly_open() {
        let mut agg = ProfileAggregate::new(0.5);
        // Positions on bin boundaries are dropped entirely.
        agg.add(&[0.0, 0.25, 0.5, 0.6, 99.9], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(agg.samples(0), &[2.0]);
        assert_eq!(agg.samples(1), &[4.0]);
        assert_eq!(agg.samples(199), &[5.0]);
        let collected: usize = (0..agg.bin_count()).map(|b| agg.samples(b).len()).sum();
        assert_eq!(collected, 3);
    }

    #[test]
    fn reduce_computes_rank_statistics_per_bin() {
        let mut agg = ProfileAggregate::new(50.0);
        for v in 1..=100 {
            agg.add(&[25.0, 75.0], &[v as f64, 200.0]);
        }
        let curve = agg.reduce().unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.counts, vec![100, 100]);
        assert!((curve.medians[0] - 51.0).abs() < 1e-12);
        assert!((curve.q25[0] - 26.0).abs() < 1e-12);
        assert!((curve.q75[0] - 76.0).abs() < 1e-12);
        assert!((curve.q10[0] - 11.0).abs() < 1e-12);
        assert!((curve.q90[0] - 91.0).abs() < 1e-12);
        assert!((curve.medians[1] - 200.0).abs() < 1e-12);
    }

    #[test]
    fn reduce_rejects_entirely_empty_aggregate() {
        let agg = ProfileAggregate::new(0.5);
        assert_eq!(agg.reduce().unwrap_err(), EmptyAggregate);
    }

    #[test]
    fn gap_repair_fills_leading_and_trailing_bins() {
        // A 160-point profile at increment 0.5 leaves every bin whose lower
        // edge is a whole multiple of 2.5 without a strictly-interior
        // sample. The leading and trailing gaps are repaired from their
        // neighbors; interior gaps keep zero statistics.
        let p = Profile::new((0..160).map(|i| 100.0 + i as f64).collect());
        let curve = aggregate_of(&[p], 0.5).reduce().unwrap();
        assert_eq!(curve.len(), 200);
        // Bin 0 covers (0, 0.5): empty, position 0 < 1, repaired from bin 1.
        assert_eq!(curve.counts[0], 0);
        assert!(curve.counts[1] > 0);
        assert!((curve.medians[0] - curve.medians[1]).abs() < 1e-12);
        assert!(curve.medians[0] > 0.0);
        // Bin 199 covers (99.5, 100): the only candidate position 99.5 sits
        // on the open lower edge, so the bin is empty and repaired from bin
        // 198.
        assert_eq!(curve.counts[199], 0);
        assert!(curve.counts[198] > 0);
        assert!((curve.medians[199] - curve.medians[198]).abs() < 1e-12);
        assert!(curve.medians[199] > 0.0);
        // An interior empty bin (lower edge 2.5) keeps zero statistics.
        assert_eq!(curve.counts[5], 0);
        assert_eq!(curve.medians[5], 0.0);
    }

    #[test]
    fn dense_population_fills_every_bin() {
        let profiles: Vec<Profile> = (0..10)
            .map(|k| Profile::new(vec![180.0 + k as f64; 360]))
            .collect();
        let curve = aggregate_of(&profiles, 0.5).reduce().unwrap();
        assert_eq!(curve.populated_bins(), 200);
        for (m, c) in curve.medians.iter().zip(&curve.counts) {
            assert!(*c > 0);
            assert!(*m >= 180.0 && *m <= 189.0);
        }
    }

    #[test]
    fn merge_combines_partial_aggregates() {
        let mut a = ProfileAggregate::new(1.0);
        a.add(&[10.5], &[1.0]);
        let mut b = ProfileAggregate::new(1.0);
        b.add(&[10.6, 20.5], &[2.0, 3.0]);
        a.merge(&b);
        assert_eq!(a.samples(10), &[1.0, 2.0]);
        assert_eq!(a.samples(20), &[3.0]);
    }
}
