//! Baseline-relative streaming anomaly detection for FAST stroke pre-screening.
//!
//! The library scores a live stream of observations against a short personal
//! calibration:
//! 1. A feature extractor turns each observation into one scalar signal
//! 2. The first signals fill a baseline window describing the subject's "normal"
//! 3. Later signals fill a recent window whose mean is compared to the baseline
//!    mean against an adaptive threshold
//! 4. A persistence latch turns sustained deviation into an alert that stays up
//!    until the caller resets the session
//!
//! Two modalities are provided: a facial asymmetry index computed from eye and
//! mouth corner landmarks, and a speaking rate computed from transcribed audio.
//!
//! # Examples
//!
//! ## Facial asymmetry
//!
//! ```
//! use fast_screening::{
//!     config::SessionConfig,
//!     features::facial::{FaceLandmarks, FaceObservation, FacialAsymmetryExtractor, Landmark},
//!     session::{AlertState, DetectionSession},
//! };
//!
//! # fn main() -> fast_screening::Result<()> {
//! let mut session = DetectionSession::new(SessionConfig::facial(), FacialAsymmetryExtractor::default())?;
//!
//! let landmarks = FaceLandmarks {
//!     eye_left: Landmark::new(0.35, 0.40),
//!     eye_right: Landmark::new(0.65, 0.40),
//!     mouth_left: Landmark::new(0.40, 0.70),
//!     mouth_right: Landmark::new(0.60, 0.70),
//! };
//! let frame = FaceObservation::new(landmarks, 640, 480);
//!
//! // One call per rendered frame
//! for i in 0..60 {
//!     session.detect_frame(&frame, f64::from(i) * 33.3);
//! }
//! assert_eq!(session.state(), AlertState::Monitoring);
//!
//! if let Some(result) = session.detect_frame(&frame, 2000.0).result() {
//!     println!("index {:.3} (baseline {:.3})", result.recent_mean, result.baseline_mean);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Reusing a calibration
//!
//! ```
//! use fast_screening::{
//!     baseline::PriorBaseline,
//!     config::SessionConfig,
//!     features::facial::FacialAsymmetryExtractor,
//!     session::{AlertState, DetectionSession},
//! };
//!
//! # fn main() -> fast_screening::Result<()> {
//! let config = SessionConfig {
//!     prior_baseline: Some(PriorBaseline::Stats { mean: 0.01, dispersion: 0.005 }),
//!     ..SessionConfig::facial()
//! };
//! let session = DetectionSession::new(config, FacialAsymmetryExtractor::default())?;
//! assert_eq!(session.state(), AlertState::Monitoring);
//! # Ok(())
//! # }
//! ```
//!
//! ## Speech rate
//!
//! ```
//! use fast_screening::{
//!     config::SpeechConfig,
//!     features::speech::SpeechSegment,
//!     speech_monitor::SpeechRateMonitor,
//!     wire::SessionId,
//! };
//!
//! # fn main() -> fast_screening::Result<()> {
//! let mut monitor = SpeechRateMonitor::new(SessionId::new("demo"), SpeechConfig::default())?;
//! monitor.calibrate(&SpeechSegment::new("o rato roeu a roupa do rei de roma", 6.0))?;
//!
//! let response = monitor.submit_segment(&SpeechSegment::new("o rato", 1.0));
//! println!("warning active: {}", response.warning_active);
//! # Ok(())
//! # }
//! ```

/// Fixed-capacity FIFO windows with population statistics
pub mod rolling_window;

/// Adaptive threshold and deviation direction
pub mod threshold;

/// Persistence counter with an irreversible alert latch
pub mod latch;

/// Baseline seeding, persistence and drift absorption
pub mod baseline;

/// Feature extractors for each modality
pub mod features;

/// Detection session state machine
pub mod session;

/// Handle-based session management
pub mod registry;

/// Wire records of the speech-rate service
pub mod wire;

/// Speech-rate instance of the engine
pub mod speech_monitor;

/// Recorded observation traces
pub mod replay;

/// Error types and result handling
pub mod error;

/// Constants used throughout the engine
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
