//! Adaptive deviation threshold and deviation direction.

use crate::rolling_window::RollingWindow;
use serde::{Deserialize, Serialize};

/// Threshold derived from the dispersion of the baseline window.
///
/// A very stable baseline still needs `min_threshold` of absolute deviation to
/// count, while a noisy one scales the bar by `k` standard deviations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    min_threshold: f64,
    k: f64,
}

impl ThresholdPolicy {
    /// Create a policy with the given floor and standard deviation multiplier
    #[must_use]
    pub fn new(min_threshold: f64, k: f64) -> Self {
        Self { min_threshold, k }
    }

    /// `max(min_threshold, k * std_dev(baseline))`
    #[must_use]
    pub fn compute(&self, baseline: &RollingWindow) -> f64 {
        self.min_threshold.max(self.k * baseline.std_dev())
    }

    /// Absolute floor of the threshold
    #[must_use]
    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    /// Standard deviation multiplier
    #[must_use]
    pub fn k(&self) -> f64 {
        self.k
    }
}

/// Which direction of departure from the baseline counts as a deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationMode {
    /// Either direction (facial asymmetry)
    #[default]
    Absolute,
    /// Recent mean below the baseline (slowed speech)
    Drop,
    /// Recent mean above the baseline
    Rise,
}

impl DeviationMode {
    /// Deviation of `recent_mean` from `baseline_mean`; positive means "towards anomaly"
    #[must_use]
    pub fn deviation(self, recent_mean: f64, baseline_mean: f64) -> f64 {
        match self {
            Self::Absolute => (recent_mean - baseline_mean).abs(),
            Self::Drop => baseline_mean - recent_mean,
            Self::Rise => recent_mean - baseline_mean,
        }
    }
}
