//! Speech-rate instance of the detection engine.
//!
//! The speaker first records a 5–20 s calibration sample; its transcript rate
//! becomes the baseline. Later segments are scored for a sustained drop below
//! that rate, reusing [`DetectionSession`] in [`DeviationMode::Drop`] with the
//! threshold floor set to a fixed fraction of the baseline.
//!
//! [`DeviationMode::Drop`]: crate::threshold::DeviationMode::Drop

use crate::config::SpeechConfig;
use crate::features::speech::{SpeechRateExtractor, SpeechSegment};
use crate::features::FeatureExtractor;
use crate::session::{Detection, DetectionSession, ResetOptions};
use crate::wire::{
    CalibrationResult, CalibrationStatus, ChunkResponse, ChunkStatus, DismissStatus, DismissWarningResponse,
    ServiceState, SessionId, TranscriptSegment, TranscriptsResponse,
};
use crate::{Error, Result};
use log::{debug, info, warn};

/// Validate a calibration sample and compute its baseline rate
///
/// Samples longer than the configured maximum are accepted and reported at the
/// maximum duration. The transcript cannot be cut at that boundary, so the rate
/// is taken over the whole sample.
///
/// # Errors
///
/// `Error::CalibrationTooShort` when the sample is below the minimum duration,
/// `Error::InvalidInput` for an empty transcript
pub fn calibration_from_sample(sample: &SpeechSegment, config: &SpeechConfig) -> Result<CalibrationResult> {
    if sample.duration_secs.is_nan() || sample.duration_secs < config.calibration_min_secs {
        return Err(Error::CalibrationTooShort {
            duration: sample.duration_secs,
            minimum: config.calibration_min_secs,
        });
    }

    let baseline = SpeechRateExtractor
        .extract(sample)
        .map_err(|reason| Error::InvalidInput(format!("Calibration sample unusable: {reason}")))?;

    let duration = if sample.duration_secs > config.calibration_max_secs {
        warn!(
            "Calibration sample of {:.1}s trimmed to {:.1}s",
            sample.duration_secs, config.calibration_max_secs
        );
        config.calibration_max_secs
    } else {
        sample.duration_secs
    };

    Ok(CalibrationResult {
        baseline,
        duration,
        text: sample.text.trim().to_string(),
    })
}

/// Scores transcribed segments of one speaker against their calibrated rate
pub struct SpeechRateMonitor {
    session_id: SessionId,
    config: SpeechConfig,
    calibration: Option<CalibrationResult>,
    session: Option<DetectionSession<SpeechRateExtractor>>,
    transcripts: Vec<TranscriptSegment>,
    elapsed_ms: f64,
}

impl SpeechRateMonitor {
    /// Create an uncalibrated monitor
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if `config` is unusable
    pub fn new(session_id: SessionId, config: SpeechConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            session_id,
            config,
            calibration: None,
            session: None,
            transcripts: Vec::new(),
            elapsed_ms: 0.0,
        })
    }

    /// Calibrate from a recorded sample, replacing any earlier calibration
    pub fn calibrate(&mut self, sample: &SpeechSegment) -> Result<CalibrationResult> {
        let result = calibration_from_sample(sample, &self.config)?;
        self.load_calibration(result.clone())?;
        Ok(result)
    }

    /// Adopt a calibration produced earlier (by this monitor or by the service)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the baseline rate is not a positive number
    pub fn load_calibration(&mut self, calibration: CalibrationResult) -> Result<()> {
        if !(calibration.baseline.is_finite() && calibration.baseline > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Calibration baseline must be a positive rate, got {}",
                calibration.baseline
            )));
        }

        let session = DetectionSession::new(self.config.session_config(calibration.baseline), SpeechRateExtractor)?;
        info!(
            "Speech session {} calibrated at {:.2} chars/s over {:.1}s",
            self.session_id, calibration.baseline, calibration.duration
        );
        self.session = Some(session);
        self.calibration = Some(calibration);
        Ok(())
    }

    /// Score one transcribed segment
    pub fn submit_segment(&mut self, segment: &SpeechSegment) -> ChunkResponse {
        let timestamp_ms = self.elapsed_ms;
        if segment.duration_secs.is_finite() && segment.duration_secs > 0.0 {
            self.elapsed_ms += segment.duration_secs * 1000.0;
        }

        let missing = match self.session.as_mut().map(|s| s.detect_frame(segment, timestamp_ms)) {
            Some(Detection::Scored(_)) => None,
            Some(Detection::NoSignal(reason)) => Some(reason),
            None => SpeechRateExtractor.extract(segment).err(),
        };
        if let Some(reason) = missing {
            debug!("Speech segment at {timestamp_ms:.0}ms skipped: {reason}");
            return self.response(ChunkStatus::Listening, None);
        }

        let chars_per_second = segment.chars_per_second();
        let is_below_threshold = self
            .baseline()
            .is_some_and(|baseline| chars_per_second < baseline * self.config.below_baseline_ratio);

        let transcript = TranscriptSegment {
            number: u32::try_from(self.transcripts.len() + 1).unwrap_or(u32::MAX),
            text: segment.text.trim().to_string(),
            words_per_second: segment.words_per_second(),
            chars_per_second,
            is_below_threshold,
        };
        self.transcripts.push(transcript.clone());
        self.response(ChunkStatus::Transcribed, Some(transcript))
    }

    fn response(&self, status: ChunkStatus, transcript: Option<TranscriptSegment>) -> ChunkResponse {
        ChunkResponse {
            status,
            transcript,
            warning_active: self.warning_active(),
        }
    }

    /// Clear an active warning, keeping the calibration
    pub fn dismiss_warning(&mut self) -> DismissWarningResponse {
        if let Some(session) = self.session.as_mut() {
            session.reset(ResetOptions::default());
        }
        DismissWarningResponse {
            status: DismissStatus::Dismissed,
        }
    }

    /// Calibration status in the service's shape
    #[must_use]
    pub fn status(&self) -> CalibrationStatus {
        CalibrationStatus {
            calibrated: self.calibration.is_some(),
            baseline: self.baseline(),
            duration: self.calibration.as_ref().map(|c| c.duration),
            warning_active: self.warning_active(),
            state: Some(ServiceState::Listening),
        }
    }

    /// Every transcript scored so far
    #[must_use]
    pub fn transcripts(&self) -> TranscriptsResponse {
        TranscriptsResponse {
            session_id: self.session_id.clone(),
            transcripts: self.transcripts.clone(),
        }
    }

    /// Whether a sustained slowdown has latched
    #[must_use]
    pub fn warning_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.state().is_alerted())
    }

    /// Calibrated baseline rate in characters per second
    #[must_use]
    pub fn baseline(&self) -> Option<f64> {
        self.calibration.as_ref().map(|c| c.baseline)
    }

    /// Underlying detection session, once calibrated
    #[must_use]
    pub fn session(&self) -> Option<&DetectionSession<SpeechRateExtractor>> {
        self.session.as_ref()
    }

    /// Identifier of this monitor
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}
