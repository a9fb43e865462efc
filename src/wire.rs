//! Wire records of the external speech-rate service.
//!
//! The service runs voice activity detection and transcription remotely; its
//! JSON bodies are mirrored here so a host can decode them, and so
//! [`crate::speech_monitor::SpeechRateMonitor`] can answer in the same shape.
//! Field names follow the service verbatim. Where the service and its web
//! client disagree on a name, the client's name is primary and the service's
//! is accepted as an alias.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session identifier chosen by the client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Audio upload: base64 encoded little-endian int16 PCM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioChunkRequest {
    /// Session the audio belongs to
    pub session_id: SessionId,
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Base64 encoded PCM payload
    pub samples: String,
}

/// Processing state of a service session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    /// Waiting for speech
    Listening,
    /// Speech detected, buffering a segment
    Recording,
    /// Buffering the calibration sample
    Calibrating,
}

/// Status reported for each uploaded chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    /// Chunk added to the calibration sample
    Calibrating,
    /// Chunk closed a segment, which was transcribed and scored
    Transcribed,
    /// No speech in progress
    Listening,
    /// Chunk added to the current segment
    Recording,
}

impl From<ServiceState> for ChunkStatus {
    fn from(state: ServiceState) -> Self {
        match state {
            ServiceState::Listening => Self::Listening,
            ServiceState::Recording => Self::Recording,
            ServiceState::Calibrating => Self::Calibrating,
        }
    }
}

/// Reply to a calibration start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationStarted {
    /// Always `calibrating`
    pub status: ServiceState,
}

/// Baseline computed when calibration finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Baseline speaking rate in characters per second
    #[serde(alias = "baseline_chars_per_second")]
    pub baseline: f64,
    /// Calibration sample length in seconds
    pub duration: f64,
    /// Transcript of the calibration sample
    #[serde(alias = "transcription")]
    pub text: String,
}

/// Either a finished calibration or the service's refusal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalibrationOutcome {
    /// Baseline computed
    Finished(CalibrationResult),
    /// Calibration refused
    Failed {
        /// Human readable reason
        error: String,
    },
}

/// One scored speech segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// 1-based sequence number within the session
    pub number: u32,
    /// Transcribed text
    pub text: String,
    /// Speaking rate in words per second
    pub words_per_second: f64,
    /// Speaking rate in characters per second
    pub chars_per_second: f64,
    /// Rate fell below the configured fraction of the calibrated baseline
    #[serde(default)]
    pub is_below_threshold: bool,
}

/// Reply to an audio chunk upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResponse {
    /// What the chunk did to the session
    pub status: ChunkStatus,
    /// Scored segment, when the chunk closed one
    #[serde(default)]
    pub transcript: Option<TranscriptSegment>,
    /// Sustained slowdown latched and not yet dismissed
    #[serde(default)]
    pub warning_active: bool,
}

/// Reply to a calibration status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStatus {
    /// Whether a baseline exists
    pub calibrated: bool,
    /// Baseline rate in characters per second
    pub baseline: Option<f64>,
    /// Calibration sample length in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Sustained slowdown latched and not yet dismissed
    #[serde(default)]
    pub warning_active: bool,
    /// Processing state, absent for unknown sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServiceState>,
}

/// Outcome of dismissing a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissStatus {
    /// Warning cleared
    Dismissed,
    /// No such session
    SessionNotFound,
}

/// Reply to a warning dismissal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissWarningResponse {
    /// Outcome
    pub status: DismissStatus,
}

/// All transcripts of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptsResponse {
    /// Session queried
    pub session_id: SessionId,
    /// Scored segments, oldest first
    pub transcripts: Vec<TranscriptSegment>,
}
