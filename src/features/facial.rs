//! Facial asymmetry index.
//!
//! The index measures how far the mouth-corner line tilts away from the eye
//! line. Both lines are measured in pixels, the mouth vector is rotated into a
//! frame aligned with the eyes and its vertical component is divided by the
//! eye distance. The result is independent of head roll and of how close the
//! face is to the camera: zero for a level mouth, growing as one corner droops.

use super::{FeatureExtractor, NoSignal};
use crate::constants::{
    MESH_EYE_LEFT_OUTER, MESH_EYE_RIGHT_OUTER, MESH_MOUTH_LEFT, MESH_MOUTH_RIGHT, MIN_EYE_DISTANCE_PX,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Landmark position in normalized `[0, 1]` image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 at the left edge
    pub x: f64,
    /// Vertical position, 0 at the top edge
    pub y: f64,
}

impl Landmark {
    /// Create a landmark from normalized coordinates
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn to_pixels(self, width: f64, height: f64) -> Point2<f64> {
        Point2::new(self.x * width, self.y * height)
    }
}

/// The four named points the asymmetry index is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Outer corner of the left eye
    pub eye_left: Landmark,
    /// Outer corner of the right eye
    pub eye_right: Landmark,
    /// Left mouth corner
    pub mouth_left: Landmark,
    /// Right mouth corner
    pub mouth_right: Landmark,
}

impl FaceLandmarks {
    /// Pick the required points out of a MediaPipe face mesh (468 or 478 points).
    ///
    /// Returns `None` when the mesh is too short to contain them.
    #[must_use]
    pub fn from_mesh(mesh: &[Landmark]) -> Option<Self> {
        Some(Self {
            eye_left: *mesh.get(MESH_EYE_LEFT_OUTER)?,
            eye_right: *mesh.get(MESH_EYE_RIGHT_OUTER)?,
            mouth_left: *mesh.get(MESH_MOUTH_LEFT)?,
            mouth_right: *mesh.get(MESH_MOUTH_RIGHT)?,
        })
    }

    fn is_finite(&self) -> bool {
        [self.eye_left, self.eye_right, self.mouth_left, self.mouth_right]
            .iter()
            .all(|p| p.is_finite())
    }
}

/// One video frame's worth of landmark output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Landmarks of the tracked face, `None` when no face was found
    pub landmarks: Option<FaceLandmarks>,
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
}

impl FaceObservation {
    /// Observation for a frame where a face was found
    #[must_use]
    pub fn new(landmarks: FaceLandmarks, frame_width: u32, frame_height: u32) -> Self {
        Self {
            landmarks: Some(landmarks),
            frame_width,
            frame_height,
        }
    }

    /// Observation for a frame without a face
    #[must_use]
    pub fn no_face(frame_width: u32, frame_height: u32) -> Self {
        Self {
            landmarks: None,
            frame_width,
            frame_height,
        }
    }

    /// Observation built from a full face mesh, if one was detected
    #[must_use]
    pub fn from_mesh(mesh: Option<&[Landmark]>, frame_width: u32, frame_height: u32) -> Self {
        Self {
            landmarks: mesh.and_then(FaceLandmarks::from_mesh),
            frame_width,
            frame_height,
        }
    }
}

/// Extracts the mouth-vs-eye-line skew index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacialAsymmetryExtractor {
    min_eye_distance: f64,
}

impl Default for FacialAsymmetryExtractor {
    fn default() -> Self {
        Self::new(MIN_EYE_DISTANCE_PX)
    }
}

impl FacialAsymmetryExtractor {
    /// Create an extractor rejecting eye distances below `min_eye_distance` pixels
    #[must_use]
    pub fn new(min_eye_distance: f64) -> Self {
        Self { min_eye_distance }
    }

    /// Compute the skew index for landmarks already known to be present
    pub fn skew(&self, landmarks: &FaceLandmarks, frame_width: u32, frame_height: u32) -> Result<f64, NoSignal> {
        if frame_width == 0 || frame_height == 0 {
            return Err(NoSignal::DegenerateGeometry);
        }
        if !landmarks.is_finite() {
            return Err(NoSignal::NonFinite);
        }

        let (width, height) = (f64::from(frame_width), f64::from(frame_height));
        let eye_left = landmarks.eye_left.to_pixels(width, height);
        let eye_right = landmarks.eye_right.to_pixels(width, height);
        let mouth_left = landmarks.mouth_left.to_pixels(width, height);
        let mouth_right = landmarks.mouth_right.to_pixels(width, height);

        let eye_vector = eye_left - eye_right;
        let eye_distance = eye_vector.norm();
        if eye_distance < self.min_eye_distance {
            return Err(NoSignal::DegenerateGeometry);
        }
        let eye_angle = eye_vector.y.atan2(eye_vector.x);

        // Vertical component of the mouth vector in the eye-aligned frame
        let mouth_vector = mouth_left - mouth_right;
        let (sin, cos) = (-eye_angle).sin_cos();
        let aligned_vertical = mouth_vector.x * sin + mouth_vector.y * cos;

        let skew = aligned_vertical / eye_distance;
        if skew.is_finite() {
            Ok(skew)
        } else {
            Err(NoSignal::NonFinite)
        }
    }
}

impl FeatureExtractor for FacialAsymmetryExtractor {
    type Observation = FaceObservation;

    fn extract(&self, observation: &FaceObservation) -> Result<f64, NoSignal> {
        let landmarks = observation.landmarks.as_ref().ok_or(NoSignal::NoFace)?;
        self.skew(landmarks, observation.frame_width, observation.frame_height)
    }

    fn name(&self) -> &str {
        "FacialAsymmetry"
    }
}
