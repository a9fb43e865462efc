//! Feature extractors turning one raw observation into a scalar signal.
//!
//! Each modality (face landmarks, transcribed speech) implements
//! [`FeatureExtractor`]; the detection session is generic over it and never
//! looks inside an observation itself.

/// Facial asymmetry index from eye and mouth corner landmarks
pub mod facial;

/// Speaking rate in characters per second from transcribed segments
pub mod speech;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an observation produced no signal this tick.
///
/// Not an error: the session skips the tick without mutating any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSignal {
    /// No face, or one of the required landmarks is missing
    NoFace,
    /// Landmarks collapse onto each other, or the frame has no area
    DegenerateGeometry,
    /// A coordinate or the computed value is NaN or infinite
    NonFinite,
    /// The transcript holds no characters
    EmptyTranscript,
    /// The segment duration is zero, negative or not finite
    InvalidDuration,
}

impl fmt::Display for NoSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoFace => "no face detected",
            Self::DegenerateGeometry => "degenerate landmark geometry",
            Self::NonFinite => "non-finite signal",
            Self::EmptyTranscript => "empty transcript",
            Self::InvalidDuration => "invalid segment duration",
        };
        f.write_str(text)
    }
}

/// Capability shared by all modalities
pub trait FeatureExtractor {
    /// Raw input consumed once per tick
    type Observation;

    /// Compute the scalar signal for one observation
    fn extract(&self, observation: &Self::Observation) -> Result<f64, NoSignal>;

    /// Get extractor name
    fn name(&self) -> &str;
}
