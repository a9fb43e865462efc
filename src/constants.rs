//! Constants used throughout the engine

/// Baseline window capacity for the facial modality (≈ 2 s at 30 fps)
pub const FACIAL_BASELINE_CAPACITY: usize = 60;

/// Recent window capacity for the facial modality
pub const FACIAL_RECENT_CAPACITY: usize = 10;

/// Consecutive deviating decision ticks required to latch a facial alert
pub const FACIAL_PERSIST_LIMIT: u32 = 8;

/// Absolute threshold floor for the facial asymmetry index
pub const FACIAL_MIN_THRESHOLD: f64 = 0.07;

/// Baseline standard deviations that make up the facial threshold
pub const FACIAL_THRESHOLD_K: f64 = 3.0;

/// Fraction of the threshold under which recent statistics count as quiet
pub const QUIET_BAND_RATIO: f64 = 0.5;

/// MediaPipe face mesh indices of the four points the asymmetry index needs
pub const MESH_EYE_LEFT_OUTER: usize = 33;
pub const MESH_EYE_RIGHT_OUTER: usize = 263;
pub const MESH_MOUTH_LEFT: usize = 61;
pub const MESH_MOUTH_RIGHT: usize = 291;

/// Minimum eye distance in pixels before the geometry is considered degenerate
pub const MIN_EYE_DISTANCE_PX: f64 = 1e-6;

/// Speech calibration sample bounds in seconds
pub const SPEECH_CALIBRATION_MIN_SECS: f64 = 5.0;
pub const SPEECH_CALIBRATION_MAX_SECS: f64 = 20.0;

/// A segment is below threshold when slower than this fraction of the baseline rate
pub const SPEECH_BELOW_BASELINE_RATIO: f64 = 0.5;

/// Default speech windows; the baseline is seeded from the single calibrated rate
pub const SPEECH_BASELINE_CAPACITY: usize = 10;
pub const SPEECH_RECENT_CAPACITY: usize = 2;
pub const SPEECH_PERSIST_LIMIT: u32 = 2;
