//! Detection session: calibrate a personal baseline, then watch for sustained deviation.
//!
//! A session moves through three phases:
//!
//! 1. **Calibrating**: every signal goes into the baseline window; no deviation is measured.
//! 2. **Monitoring**: once the baseline is full, signals go into the recent window
//!    and, whenever it is full too, `mean(recent)` is compared to `mean(baseline)`
//!    against the adaptive threshold. Quiet recent means are folded back into the
//!    baseline so slow benign drift is tolerated.
//! 3. **Alerted**: the persistence counter reached its limit. Ticks are still
//!    scored for display but the state never goes back without [`DetectionSession::reset`].
//!
//! The session is a plain value owned by its caller. Each call to
//! [`DetectionSession::detect_frame`] is one synchronous step with no I/O.

use crate::baseline::{BaselineAdapter, PriorBaseline};
use crate::config::SessionConfig;
use crate::features::{FeatureExtractor, NoSignal};
use crate::latch::HysteresisLatch;
use crate::rolling_window::RollingWindow;
use crate::threshold::ThresholdPolicy;
use crate::Result;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    /// Collecting the baseline
    Calibrating,
    /// Scoring live signals against the baseline
    Monitoring,
    /// Sustained deviation detected; terminal until reset
    Alerted,
}

impl AlertState {
    /// Whether the alert has fired
    #[must_use]
    pub fn is_alerted(self) -> bool {
        self == Self::Alerted
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Calibrating => "calibrating",
            Self::Monitoring => "monitoring",
            Self::Alerted => "alerted",
        };
        f.write_str(text)
    }
}

/// Outcome of one scored tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// State after this tick
    pub state: AlertState,
    /// Signal extracted for this tick
    pub signal: f64,
    /// Caller supplied monotonic timestamp
    pub timestamp_ms: f64,
    /// Mean of the recent window (mirrors `baseline_mean` while calibrating)
    pub recent_mean: f64,
    /// Mean of the baseline window used for this decision
    pub baseline_mean: f64,
    /// Deviation of `recent_mean` from `baseline_mean` in the configured direction (0 while calibrating)
    pub delta: f64,
    /// Threshold in effect for this tick
    pub threshold: f64,
    /// Persistence counter after this tick
    pub persistence: u32,
}

/// Result of feeding one observation to a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    /// The observation produced a signal and the session advanced
    Scored(DetectionResult),
    /// No signal this tick; the session is unchanged
    NoSignal(NoSignal),
}

impl Detection {
    /// The scored result, if any
    #[must_use]
    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            Self::Scored(result) => Some(result),
            Self::NoSignal(_) => None,
        }
    }

    /// Whether this tick produced no signal
    #[must_use]
    pub fn is_no_signal(&self) -> bool {
        matches!(self, Self::NoSignal(_))
    }
}

/// Options for [`DetectionSession::reset`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOptions {
    /// Also discard the baseline and calibrate again from scratch
    pub reseed_baseline: bool,
}

/// Baseline-relative anomaly detector for one modality
pub struct DetectionSession<E: FeatureExtractor> {
    extractor: E,
    config: SessionConfig,
    baseline: RollingWindow,
    recent: RollingWindow,
    policy: ThresholdPolicy,
    latch: HysteresisLatch,
    adapter: BaselineAdapter,
    state: AlertState,
}

impl<E: FeatureExtractor> DetectionSession<E> {
    /// Create a session, seeding the baseline from `config.prior_baseline` if present
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` for unusable settings and
    /// `Error::InvalidInput` for a malformed prior baseline
    pub fn new(config: SessionConfig, extractor: E) -> Result<Self> {
        config.validate()?;

        let mut session = Self {
            baseline: RollingWindow::new(config.baseline_capacity),
            recent: RollingWindow::new(config.recent_capacity),
            policy: ThresholdPolicy::new(config.min_threshold, config.threshold_k),
            latch: HysteresisLatch::new(config.persist_limit),
            adapter: BaselineAdapter::new(config.quiet_band_ratio),
            state: AlertState::Calibrating,
            extractor,
            config,
        };

        if let Some(prior) = session.config.prior_baseline.clone() {
            session.load_baseline(&prior)?;
        }

        debug!(
            "Created {} session (baseline {}, recent {}, persist {})",
            session.extractor.name(),
            session.config.baseline_capacity,
            session.config.recent_capacity,
            session.config.persist_limit
        );
        Ok(session)
    }

    /// Extract a signal from `observation` and advance the session by one tick
    pub fn detect_frame(&mut self, observation: &E::Observation, timestamp_ms: f64) -> Detection {
        match self.extractor.extract(observation) {
            Ok(signal) => self.process_signal(signal, timestamp_ms),
            Err(reason) => {
                trace!("{} tick at {timestamp_ms:.1}ms skipped: {reason}", self.extractor.name());
                Detection::NoSignal(reason)
            }
        }
    }

    /// Advance the session with an already extracted signal
    pub fn process_signal(&mut self, signal: f64, timestamp_ms: f64) -> Detection {
        if !signal.is_finite() {
            return Detection::NoSignal(NoSignal::NonFinite);
        }

        if self.state == AlertState::Calibrating {
            return Detection::Scored(self.calibrate(signal, timestamp_ms));
        }

        self.recent.push(signal);

        let baseline_mean = self.baseline.mean();
        let recent_mean = self.recent.mean();
        let threshold = self.policy.compute(&self.baseline);
        let delta = self.config.deviation_mode.deviation(recent_mean, baseline_mean);
        let deviating = self.recent.is_full() && delta > threshold;

        let was_latched = self.latch.is_latched();
        if self.latch.update(deviating) {
            if !was_latched {
                info!(
                    "{} alert latched at {timestamp_ms:.1}ms: recent {recent_mean:.4} vs baseline {baseline_mean:.4} (threshold {threshold:.4})",
                    self.extractor.name()
                );
            }
            self.state = AlertState::Alerted;
        } else if self.adapter.absorb(&mut self.baseline, &self.recent, threshold) {
            trace!("Absorbed recent mean {recent_mean:.4} into baseline");
        }

        trace!(
            "tick {timestamp_ms:.1}ms signal {signal:.4} delta {delta:.4} threshold {threshold:.4} persistence {}",
            self.latch.counter()
        );

        Detection::Scored(DetectionResult {
            state: self.state,
            signal,
            timestamp_ms,
            recent_mean,
            baseline_mean,
            delta,
            threshold,
            persistence: self.latch.counter(),
        })
    }

    fn calibrate(&mut self, signal: f64, timestamp_ms: f64) -> DetectionResult {
        self.baseline.push(signal);
        if self.baseline.is_full() {
            self.state = AlertState::Monitoring;
            debug!(
                "{} baseline calibrated at {timestamp_ms:.1}ms: mean {:.4}, std dev {:.4}",
                self.extractor.name(),
                self.baseline.mean(),
                self.baseline.std_dev()
            );
        }

        let baseline_mean = self.baseline.mean();
        DetectionResult {
            state: self.state,
            signal,
            timestamp_ms,
            recent_mean: baseline_mean,
            baseline_mean,
            delta: 0.0,
            threshold: self.policy.compute(&self.baseline),
            persistence: self.latch.counter(),
        }
    }

    /// Replace the baseline with a previously calibrated one.
    ///
    /// The recent window is cleared. The latch is left alone, so an alerted
    /// session stays alerted; a partial prior that sends the session back to
    /// calibration clears the persistence counter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the prior is malformed; the session is unchanged
    pub fn load_baseline(&mut self, prior: &PriorBaseline) -> Result<()> {
        if let Err(e) = prior.validate() {
            warn!("Rejected prior baseline: {e}");
            return Err(e);
        }

        self.adapter.seed(&mut self.baseline, prior)?;
        self.recent.clear();
        self.state = self.resting_state();
        if self.state == AlertState::Calibrating {
            // Monitoring restarts from a fresh count once the window refills
            self.latch.reset();
        }
        debug!("Loaded prior baseline, state now {}", self.state);
        Ok(())
    }

    /// Clear the recent window and the persistence latch, optionally the baseline too
    pub fn reset(&mut self, options: ResetOptions) {
        self.recent.clear();
        self.latch.reset();
        if options.reseed_baseline {
            self.baseline.clear();
        }
        self.state = self.resting_state();
        debug!(
            "Session reset (reseed baseline: {}), state now {}",
            options.reseed_baseline, self.state
        );
    }

    fn resting_state(&self) -> AlertState {
        if self.latch.is_latched() {
            AlertState::Alerted
        } else if self.baseline.is_full() {
            AlertState::Monitoring
        } else {
            AlertState::Calibrating
        }
    }

    /// Stats of the calibrated baseline, for reuse in a later session
    #[must_use]
    pub fn baseline_snapshot(&self) -> Option<PriorBaseline> {
        self.baseline.is_full().then(|| PriorBaseline::from_window(&self.baseline))
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Current persistence counter
    #[must_use]
    pub fn persistence(&self) -> u32 {
        self.latch.counter()
    }

    /// Threshold the next decision would use
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.policy.compute(&self.baseline)
    }

    /// Baseline window
    #[must_use]
    pub fn baseline(&self) -> &RollingWindow {
        &self.baseline
    }

    /// Recent window
    #[must_use]
    pub fn recent(&self) -> &RollingWindow {
        &self.recent
    }

    /// Settings the session was created with
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Feature extractor in use
    #[must_use]
    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}
