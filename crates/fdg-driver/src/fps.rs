// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sliding-window frame rate estimator.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default sliding-window capacity.
pub const DEFAULT_WINDOW_CAPACITY: usize = 45;

/// Result of [`FpsEstimator::estimate`].
///
/// `Known` values are always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fps", rename_all = "lowercase")]
pub enum FpsEstimate {
    /// Not enough samples (or a degenerate window) to say anything.
    Unknown,
    /// Smoothed frames per second.
    Known(f64),
}

impl FpsEstimate {
    /// The estimate as an `Option`.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Unknown => None,
            Self::Known(fps) => Some(fps),
        }
    }

    /// True when the estimate is known and at or below `floor`.
    ///
    /// `Unknown` never breaches: no decision is possible without data.
    pub fn at_or_below(self, floor: f64) -> bool {
        matches!(self, Self::Known(fps) if fps <= floor)
    }
}

/// Frame rate over a bounded window of recent timestamps.
///
/// The window is ordered most-recent-first. Smoothing is a plain average over
/// the whole window; capacity trades responsiveness for stability.
#[derive(Clone, Debug)]
pub struct FpsEstimator {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for FpsEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

impl FpsEstimator {
    /// Create an estimator holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a timestamp (ms), evicting the oldest sample once full.
    pub fn record(&mut self, timestamp_ms: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_back();
        }
        self.samples.push_front(timestamp_ms);
    }

    /// Deltas between consecutive samples averaged into frames per second.
    pub fn estimate(&self) -> FpsEstimate {
        if self.samples.len() < 2 {
            return FpsEstimate::Unknown;
        }
        let (count, sum_ms) = self
            .samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .fold((0usize, 0.0f64), |(n, sum), (newer, older)| {
                (n + 1, sum + (newer - older))
            });
        let sum_secs = sum_ms / 1000.0;
        if !sum_secs.is_finite() || sum_secs <= 0.0 {
            return FpsEstimate::Unknown;
        }
        #[allow(clippy::cast_precision_loss)]
        let fps = count as f64 / sum_secs;
        if fps.is_finite() {
            FpsEstimate::Known(fps)
        } else {
            FpsEstimate::Unknown
        }
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Window capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<f64> {
        self.samples.front().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn even_16ms_spacing_is_about_62_5_fps() {
        let mut fps = FpsEstimator::default();
        for i in 0..100u32 {
            fps.record(f64::from(i) * 16.0);
        }
        let est = fps.estimate().value().unwrap();
        assert!((est - 62.5).abs() <= 62.5 * 0.05, "estimate {est}");
    }

    #[test]
    fn unknown_below_two_samples() {
        let mut fps = FpsEstimator::new(8);
        assert_eq!(fps.estimate(), FpsEstimate::Unknown);
        fps.record(3.0);
        assert_eq!(fps.estimate(), FpsEstimate::Unknown);
        fps.record(19.0);
        assert!(matches!(fps.estimate(), FpsEstimate::Known(_)));
    }

    #[test]
    fn identical_timestamps_do_not_yield_infinity() {
        let mut fps = FpsEstimator::new(4);
        fps.record(5.0);
        fps.record(5.0);
        assert_eq!(fps.estimate(), FpsEstimate::Unknown);
    }

    #[test]
    fn window_is_most_recent_first() {
        let mut fps = FpsEstimator::new(3);
        for t in [1.0, 2.0, 3.0, 4.0] {
            fps.record(t);
        }
        assert_eq!(fps.len(), 3);
        assert_eq!(fps.latest(), Some(4.0));
        // oldest (1.0) evicted: 2 deltas of 1ms
        assert_eq!(fps.estimate(), FpsEstimate::Known(1000.0));
    }

    #[test]
    fn unknown_never_breaches_floor() {
        assert!(!FpsEstimate::Unknown.at_or_below(25.0));
        assert!(FpsEstimate::Known(25.0).at_or_below(25.0));
        assert!(!FpsEstimate::Known(25.5).at_or_below(25.0));
    }

    proptest! {
        #[test]
        fn window_never_exceeds_capacity(cap in 1usize..64, n in 0usize..256) {
            let mut fps = FpsEstimator::new(cap);
            for i in 0..n {
                fps.record(i as f64);
            }
            prop_assert_eq!(fps.len(), n.min(cap));
        }

        #[test]
        fn estimate_is_finite_or_unknown(stamps in proptest::collection::vec(-1.0e6f64..1.0e6, 0..64)) {
            let mut fps = FpsEstimator::new(45);
            for t in stamps {
                fps.record(t);
            }
            if let FpsEstimate::Known(v) = fps.estimate() {
                prop_assert!(v.is_finite());
                prop_assert!(v > 0.0);
            }
        }
    }
}
