//! Configuration management for detection sessions

use crate::baseline::PriorBaseline;
use crate::constants::{
    FACIAL_BASELINE_CAPACITY, FACIAL_MIN_THRESHOLD, FACIAL_PERSIST_LIMIT, FACIAL_RECENT_CAPACITY,
    FACIAL_THRESHOLD_K, QUIET_BAND_RATIO, SPEECH_BASELINE_CAPACITY, SPEECH_BELOW_BASELINE_RATIO,
    SPEECH_CALIBRATION_MAX_SECS, SPEECH_CALIBRATION_MIN_SECS, SPEECH_PERSIST_LIMIT, SPEECH_RECENT_CAPACITY,
};
use crate::threshold::DeviationMode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Facial asymmetry session settings
    pub facial: SessionConfig,

    /// Speech rate settings
    pub speech: SpeechConfig,
}

/// Settings of one detection session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of signals collected during calibration
    pub baseline_capacity: usize,

    /// Number of live signals averaged for each decision
    pub recent_capacity: usize,

    /// Net deviating decisions needed to latch the alert
    pub persist_limit: u32,

    /// Absolute threshold floor
    pub min_threshold: f64,

    /// Baseline standard deviations in the threshold
    pub threshold_k: f64,

    /// Direction of departure that counts as deviation
    pub deviation_mode: DeviationMode,

    /// Fraction of the threshold within which quiet recent means are folded
    /// into the baseline. Zero pins the baseline to its calibration.
    pub quiet_band_ratio: f64,

    /// Baseline from an earlier calibration, skipping live calibration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_baseline: Option<PriorBaseline>,
}

/// Speech rate monitor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Minimum calibration sample length in seconds
    pub calibration_min_secs: f64,

    /// Maximum calibration sample length in seconds
    pub calibration_max_secs: f64,

    /// Fraction of the baseline rate below which a segment counts as slow
    pub below_baseline_ratio: f64,

    /// Number of segments averaged for each decision
    pub recent_capacity: usize,

    /// Net slow decisions needed to raise the warning
    pub persist_limit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::facial()
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            calibration_min_secs: SPEECH_CALIBRATION_MIN_SECS,
            calibration_max_secs: SPEECH_CALIBRATION_MAX_SECS,
            below_baseline_ratio: SPEECH_BELOW_BASELINE_RATIO,
            recent_capacity: SPEECH_RECENT_CAPACITY,
            persist_limit: SPEECH_PERSIST_LIMIT,
        }
    }
}

impl SessionConfig {
    /// Reference settings for the facial asymmetry modality
    #[must_use]
    pub fn facial() -> Self {
        Self {
            baseline_capacity: FACIAL_BASELINE_CAPACITY,
            recent_capacity: FACIAL_RECENT_CAPACITY,
            persist_limit: FACIAL_PERSIST_LIMIT,
            min_threshold: FACIAL_MIN_THRESHOLD,
            threshold_k: FACIAL_THRESHOLD_K,
            deviation_mode: DeviationMode::Absolute,
            quiet_band_ratio: QUIET_BAND_RATIO,
            prior_baseline: None,
        }
    }

    /// Validate the settings; sessions refuse to start on failure
    pub fn validate(&self) -> Result<()> {
        if self.baseline_capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "Baseline capacity must be greater than 0".to_string(),
            ));
        }
        if self.recent_capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "Recent capacity must be greater than 0".to_string(),
            ));
        }
        if self.persist_limit == 0 {
            return Err(Error::InvalidConfiguration(
                "Persist limit must be greater than 0".to_string(),
            ));
        }
        if !self.min_threshold.is_finite() || self.min_threshold < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Minimum threshold must be finite and non-negative, got {}",
                self.min_threshold
            )));
        }
        if !self.threshold_k.is_finite() || self.threshold_k < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Threshold multiplier must be finite and non-negative, got {}",
                self.threshold_k
            )));
        }
        if !(0.0..=1.0).contains(&self.quiet_band_ratio) {
            return Err(Error::InvalidConfiguration(format!(
                "Quiet band ratio must be in [0, 1], got {}",
                self.quiet_band_ratio
            )));
        }
        if let Some(prior) = &self.prior_baseline {
            prior.validate()?;
        }
        Ok(())
    }
}

impl SpeechConfig {
    /// Session settings for a speaker calibrated at `baseline_cps` characters per second.
    ///
    /// The baseline is never adapted: a gradual slowdown is still measured
    /// against the calibrated rate.
    #[must_use]
    pub fn session_config(&self, baseline_cps: f64) -> SessionConfig {
        SessionConfig {
            baseline_capacity: SPEECH_BASELINE_CAPACITY,
            recent_capacity: self.recent_capacity,
            persist_limit: self.persist_limit,
            min_threshold: baseline_cps * (1.0 - self.below_baseline_ratio),
            threshold_k: 0.0,
            deviation_mode: DeviationMode::Drop,
            quiet_band_ratio: 0.0,
            prior_baseline: Some(PriorBaseline::Stats {
                mean: baseline_cps,
                dispersion: 0.0,
            }),
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !(self.calibration_min_secs > 0.0 && self.calibration_min_secs <= self.calibration_max_secs) {
            return Err(Error::InvalidConfiguration(format!(
                "Calibration window must satisfy 0 < min <= max, got {}..{}",
                self.calibration_min_secs, self.calibration_max_secs
            )));
        }
        if !(self.below_baseline_ratio > 0.0 && self.below_baseline_ratio < 1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "Below-baseline ratio must be in (0, 1), got {}",
                self.below_baseline_ratio
            )));
        }
        if self.recent_capacity == 0 || self.persist_limit == 0 {
            return Err(Error::InvalidConfiguration(
                "Speech recent capacity and persist limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.facial.validate()?;
        self.speech.validate()
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# FAST screening configuration

# Facial asymmetry session
facial:
  baseline_capacity: 60
  recent_capacity: 10
  persist_limit: 8
  min_threshold: 0.07
  threshold_k: 3.0
  deviation_mode: absolute
  quiet_band_ratio: 0.5

# Speech rate monitor
speech:
  calibration_min_secs: 5.0
  calibration_max_secs: 20.0
  below_baseline_ratio: 0.5
  recent_capacity: 2
  persist_limit: 2
"#;
