//! Distribution Summaries
//!
//! Histogram of observed crash points plus the closed-form survival and
//! return-to-player curves of the model they should follow.

use serde::{Deserialize, Serialize};

use crate::game::config::CrashConfig;
use crate::game::crash::CrashOutcome;

/// Lower edges of the histogram buckets. The last bucket is open-ended.
pub const BUCKET_EDGES: [f64; 6] = [1.0, 2.0, 5.0, 10.0, 50.0, 100.0];

/// Number of histogram buckets.
pub const BUCKET_COUNT: usize = BUCKET_EDGES.len();

/// Running summary of crash points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Points recorded.
    pub count: u64,
    /// Sum of all points.
    pub sum: f64,
    /// Smallest point seen.
    pub min: Option<f64>,
    /// Largest point seen.
    pub max: Option<f64>,
    /// Counts per bucket, `[1,2) [2,5) [5,10) [10,50) [50,100) [100,inf)`.
    pub buckets: [u64; BUCKET_COUNT],
    /// Points produced by the jackpot branch.
    pub jackpots: u64,
}

impl DistributionSummary {
    /// Empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a crash point.
    pub fn record(&mut self, point: f64) {
        self.count += 1;
        self.sum += point;
        self.min = Some(self.min.map_or(point, |m| m.min(point)));
        self.max = Some(self.max.map_or(point, |m| m.max(point)));
        if let Some(bucket) = bucket_index(point) {
            self.buckets[bucket] += 1;
        }
    }

    /// Record an outcome, tracking its branch.
    pub fn record_outcome(&mut self, outcome: CrashOutcome) {
        if outcome.is_jackpot() {
            self.jackpots += 1;
        }
        self.record(outcome.as_f64());
    }

    /// Mean crash point, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Fraction of points in `bucket`.
    pub fn fraction_in(&self, bucket: usize) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.buckets.get(bucket).copied().unwrap_or(0) as f64 / self.count as f64
    }

    /// Fraction of points from the jackpot branch.
    pub fn jackpot_fraction(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.jackpots as f64 / self.count as f64
    }

    /// True when each of the first four buckets strictly outnumbers the next.
    pub fn is_tail_decreasing(&self) -> bool {
        self.buckets[..4].windows(2).all(|pair| pair[0] > pair[1])
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &DistributionSummary) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *mine += theirs;
        }
        self.jackpots += other.jackpots;
    }
}

/// Histogram bucket for `point`, `None` below 1.00.
pub fn bucket_index(point: f64) -> Option<usize> {
    BUCKET_EDGES.iter().rposition(|&edge| point >= edge)
}

/// `P(M >= x)` of the continuous model, ignoring rounding.
pub fn survival_probability(config: &CrashConfig, x: f64) -> f64 {
    if x <= config.min_multiplier {
        return 1.0;
    }
    if x > config.max_multiplier {
        return 0.0;
    }

    let p_jackpot = config.jackpot_probability;
    let base = (config.rtp() / x).min(1.0);
    let span = config.jackpot_max - config.jackpot_min;
    let jackpot = ((config.jackpot_max - x) / span).clamp(0.0, 1.0);

    (1.0 - p_jackpot) * base + p_jackpot * jackpot
}

/// Expected return per unit staked when always cashing out at `target`.
pub fn theoretical_rtp(config: &CrashConfig, target: f64) -> f64 {
    target * survival_probability(config, target)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::multiplier::Multiplier;

    #[test]
    fn test_bucket_index() {
        assert_eq!(bucket_index(0.5), None);
        assert_eq!(bucket_index(1.0), Some(0));
        assert_eq!(bucket_index(1.99), Some(0));
        assert_eq!(bucket_index(2.0), Some(1));
        assert_eq!(bucket_index(49.99), Some(3));
        assert_eq!(bucket_index(99.99), Some(4));
        assert_eq!(bucket_index(1000.0), Some(5));
    }

    #[test]
    fn test_record_and_merge() {
        let mut a = DistributionSummary::new();
        assert_eq!(a.mean(), None);
        a.record(1.5);
        a.record(3.0);
        a.record_outcome(CrashOutcome::Jackpot(Multiplier::from_hundredths(55_000)));

        assert_eq!(a.count, 3);
        assert_eq!(a.min, Some(1.5));
        assert_eq!(a.max, Some(550.0));
        assert_eq!(a.buckets, [1, 1, 0, 0, 0, 1]);
        assert_eq!(a.jackpots, 1);
        assert!((a.mean().unwrap() - 554.5 / 3.0).abs() < 1e-9);

        let mut b = DistributionSummary::new();
        b.record(1.0);
        b.merge(&a);
        assert_eq!(b.count, 4);
        assert_eq!(b.min, Some(1.0));
        assert_eq!(b.max, Some(550.0));
        assert_eq!(b.buckets, [2, 1, 0, 0, 0, 1]);
        assert_eq!(b.fraction_in(0), 0.5);
        assert_eq!(b.jackpot_fraction(), 0.25);
    }

    #[test]
    fn test_tail_decreasing() {
        let mut s = DistributionSummary::new();
        for (point, n) in [(1.5, 4), (3.0, 3), (7.0, 2), (20.0, 1)] {
            for _ in 0..n {
                s.record(point);
            }
        }
        assert!(s.is_tail_decreasing());

        s.record(20.0);
        assert!(!s.is_tail_decreasing());
    }

    #[test]
    fn test_survival_probability() {
        let config = CrashConfig::default();
        assert_eq!(survival_probability(&config, 0.5), 1.0);
        assert_eq!(survival_probability(&config, 1.0), 1.0);
        assert_eq!(survival_probability(&config, 1000.5), 0.0);

        // Below the jackpot range the jackpot branch always clears x
        let p2 = survival_probability(&config, 2.0);
        assert!((p2 - (0.995 * 0.485 + 0.005)).abs() < 1e-12);

        // Inside the jackpot range: 0.995 * 0.97/550 + 0.005 * 0.5
        let p550 = survival_probability(&config, 550.0);
        assert!((p550 - (0.995 * 0.97 / 550.0 + 0.0025)).abs() < 1e-12);

        // Analytic share at or above 100: just under 1.5%
        let p100 = survival_probability(&config, 100.0);
        assert!(p100 > 0.001 && p100 < 0.015, "{p100}");
    }

    #[test]
    fn test_theoretical_rtp() {
        let config = CrashConfig::default();
        let rtp = theoretical_rtp(&config, 1.5);
        // 0.995 * 0.97 + 0.005 * 1.5
        assert!((rtp - 0.97265).abs() < 1e-9);

        let fair = CrashConfig {
            house_edge: 0.0,
            jackpot_probability: 0.0,
            ..config
        };
        for target in [1.5, 2.0, 10.0, 500.0] {
            assert!((theoretical_rtp(&fair, target) - 1.0).abs() < 1e-12);
        }
    }
}
