//! Baseline seeding, persistence and drift absorption.

use crate::constants::QUIET_BAND_RATIO;
use crate::rolling_window::RollingWindow;
use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A previously calibrated baseline carried into a new session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorBaseline {
    /// Summary statistics of an earlier baseline window
    Stats {
        /// Mean of the baseline signal
        mean: f64,
        /// Population standard deviation of the baseline signal
        dispersion: f64,
    },
    /// Raw signal values recorded during an earlier calibration, oldest first
    Samples(Vec<f64>),
}

impl PriorBaseline {
    /// Summarise a window into stats
    #[must_use]
    pub fn from_window(window: &RollingWindow) -> Self {
        Self::Stats {
            mean: window.mean(),
            dispersion: window.std_dev(),
        }
    }

    /// Check the prior holds usable numbers
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Stats { mean, dispersion } => {
                if !mean.is_finite() || !dispersion.is_finite() {
                    return Err(Error::InvalidInput(format!(
                        "Prior baseline must be finite, got mean {mean} and dispersion {dispersion}"
                    )));
                }
                if *dispersion < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "Prior baseline dispersion must be non-negative, got {dispersion}"
                    )));
                }
            }
            Self::Samples(samples) => {
                if samples.is_empty() {
                    return Err(Error::InvalidInput("Prior baseline has no samples".to_string()));
                }
                if let Some(bad) = samples.iter().find(|v| !v.is_finite()) {
                    return Err(Error::InvalidInput(format!("Prior baseline sample is not finite: {bad}")));
                }
            }
        }
        Ok(())
    }

    /// Parse a prior from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let prior: Self = serde_json::from_str(json)?;
        prior.validate()?;
        Ok(prior)
    }

    /// Encode the prior as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a prior from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Save the prior to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Seeds the baseline window and folds quiet recent statistics back into it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineAdapter {
    quiet_band_ratio: f64,
}

impl Default for BaselineAdapter {
    fn default() -> Self {
        Self::new(QUIET_BAND_RATIO)
    }
}

impl BaselineAdapter {
    /// Create an adapter absorbing recent means within `quiet_band_ratio * threshold`
    #[must_use]
    pub fn new(quiet_band_ratio: f64) -> Self {
        Self { quiet_band_ratio }
    }

    /// Push `mean(recent)` into the baseline when the recent window is full and quiet.
    ///
    /// Returns whether the baseline was updated. Callers must not invoke this
    /// once an alert has latched.
    pub fn absorb(&self, baseline: &mut RollingWindow, recent: &RollingWindow, threshold: f64) -> bool {
        if !recent.is_full() {
            return false;
        }

        let recent_mean = recent.mean();
        if (recent_mean - baseline.mean()).abs() < threshold * self.quiet_band_ratio {
            baseline.push(recent_mean);
            return true;
        }
        false
    }

    /// Replace the baseline contents with values derived from `prior`.
    ///
    /// Stats are expanded into a full window whose population mean and standard
    /// deviation match the prior. Samples keep the most recent `capacity` values.
    pub fn seed(&self, baseline: &mut RollingWindow, prior: &PriorBaseline) -> Result<()> {
        prior.validate()?;
        baseline.clear();

        match prior {
            PriorBaseline::Stats { mean, dispersion } => {
                for value in expand_stats(*mean, *dispersion, baseline.capacity()) {
                    baseline.push(value);
                }
            }
            PriorBaseline::Samples(samples) => {
                let skip = samples.len().saturating_sub(baseline.capacity());
                for &value in &samples[skip..] {
                    baseline.push(value);
                }
            }
        }

        debug!(
            "Seeded baseline with {} values (mean {:.4}, std dev {:.4})",
            baseline.len(),
            baseline.mean(),
            baseline.std_dev()
        );
        Ok(())
    }

    /// Fraction of the threshold that counts as quiet
    #[must_use]
    pub fn quiet_band_ratio(&self) -> f64 {
        self.quiet_band_ratio
    }
}

/// Values `mean ± s` alternating, padded with `mean` for odd counts, scaled so
/// the population standard deviation equals `dispersion`.
#[allow(clippy::cast_precision_loss)]
fn expand_stats(mean: f64, dispersion: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![mean];
    }

    let paired = count - count % 2;
    let spread = dispersion * (count as f64 / paired as f64).sqrt();

    let mut values: Vec<f64> = (0..paired)
        .map(|i| if i % 2 == 0 { mean + spread } else { mean - spread })
        .collect();
    if paired < count {
        values.push(mean);
    }
    values
}
