//! Speaking rate from transcribed audio segments.

use super::{FeatureExtractor, NoSignal};
use serde::{Deserialize, Serialize};

/// A transcribed stretch of audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSegment {
    /// Transcript text
    pub text: String,
    /// Length of the transcribed audio in seconds
    pub duration_secs: f64,
}

impl SpeechSegment {
    /// Create a segment
    pub fn new(text: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            text: text.into(),
            duration_secs,
        }
    }

    /// Characters per second of the trimmed transcript, `0.0` for a non-positive duration
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn chars_per_second(&self) -> f64 {
        if !self.has_valid_duration() {
            return 0.0;
        }
        self.text.trim().chars().count() as f64 / self.duration_secs
    }

    /// Whitespace separated words per second, `0.0` for a non-positive duration
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn words_per_second(&self) -> f64 {
        if !self.has_valid_duration() {
            return 0.0;
        }
        self.text.split_whitespace().count() as f64 / self.duration_secs
    }

    fn has_valid_duration(&self) -> bool {
        self.duration_secs.is_finite() && self.duration_secs > 0.0
    }
}

/// Extracts characters per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeechRateExtractor;

impl FeatureExtractor for SpeechRateExtractor {
    type Observation = SpeechSegment;

    fn extract(&self, segment: &SpeechSegment) -> Result<f64, NoSignal> {
        if !segment.has_valid_duration() {
            return Err(NoSignal::InvalidDuration);
        }
        if segment.text.trim().is_empty() {
            return Err(NoSignal::EmptyTranscript);
        }
        Ok(segment.chars_per_second())
    }

    fn name(&self) -> &str {
        "SpeechRate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let segment = SpeechSegment::new("  o rato roeu  ", 2.0);
        assert_eq!(segment.chars_per_second(), 5.5);
        assert_eq!(segment.words_per_second(), 1.5);
        assert_eq!(SpeechRateExtractor.extract(&segment), Ok(5.5));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let segment = SpeechSegment::new("ação", 1.0);
        assert_eq!(segment.chars_per_second(), 4.0);
    }

    #[test]
    fn test_no_signal_cases() {
        assert_eq!(
            SpeechRateExtractor.extract(&SpeechSegment::new("   ", 1.0)),
            Err(NoSignal::EmptyTranscript)
        );
        assert_eq!(
            SpeechRateExtractor.extract(&SpeechSegment::new("hello", 0.0)),
            Err(NoSignal::InvalidDuration)
        );
        assert_eq!(
            SpeechRateExtractor.extract(&SpeechSegment::new("hello", f64::NAN)),
            Err(NoSignal::InvalidDuration)
        );
    }
}
