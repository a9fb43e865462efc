//! End-to-end facial asymmetry tests: landmarks in, alert state out

use fast_screening::baseline::PriorBaseline;
use fast_screening::config::SessionConfig;
use fast_screening::features::facial::{FaceLandmarks, FaceObservation, FacialAsymmetryExtractor, Landmark};
use fast_screening::features::{FeatureExtractor, NoSignal};
use fast_screening::session::{AlertState, Detection, DetectionSession};

const FRAME: u32 = 1000;

/// Front-facing face with the right mouth corner lowered by `droop`
fn face(droop: f64) -> FaceLandmarks {
    FaceLandmarks {
        eye_left: Landmark::new(0.35, 0.40),
        eye_right: Landmark::new(0.65, 0.40),
        mouth_left: Landmark::new(0.40, 0.70),
        mouth_right: Landmark::new(0.60, 0.70 + droop),
    }
}

/// Rotate and scale every point about the frame centre
fn transform(landmarks: &FaceLandmarks, angle: f64, scale: f64) -> FaceLandmarks {
    let (sin, cos) = angle.sin_cos();
    let apply = |p: Landmark| {
        let (x, y) = (p.x - 0.5, p.y - 0.5);
        Landmark::new(0.5 + scale * (x * cos - y * sin), 0.5 + scale * (x * sin + y * cos))
    };
    FaceLandmarks {
        eye_left: apply(landmarks.eye_left),
        eye_right: apply(landmarks.eye_right),
        mouth_left: apply(landmarks.mouth_left),
        mouth_right: apply(landmarks.mouth_right),
    }
}

fn skew(landmarks: FaceLandmarks) -> f64 {
    FacialAsymmetryExtractor::default()
        .extract(&FaceObservation::new(landmarks, FRAME, FRAME))
        .unwrap()
}

#[test]
fn test_index_is_rotation_invariant() {
    let reference = skew(face(0.04));
    for angle in [0.3, -0.5, 1.2, 3.0] {
        let rotated = skew(transform(&face(0.04), angle, 1.0));
        assert!(
            (rotated - reference).abs() < 1e-9,
            "angle {angle}: {rotated} vs {reference}"
        );
    }
}

#[test]
fn test_index_is_scale_invariant() {
    let reference = skew(face(0.04));
    for scale in [0.25, 0.5, 1.5] {
        let scaled = skew(transform(&face(0.04), 0.0, scale));
        assert!((scaled - reference).abs() < 1e-9, "scale {scale}");
    }
}

#[test]
fn test_head_tilt_alone_does_not_alert() {
    let mut session = DetectionSession::new(SessionConfig::facial(), FacialAsymmetryExtractor::default()).unwrap();

    for i in 0..300 {
        // Slow head roll back and forth, symmetric face
        let angle = 0.3 * (f64::from(i) * 0.05).sin();
        let frame = FaceObservation::new(transform(&face(0.0), angle, 1.0), FRAME, FRAME);
        let detection = session.detect_frame(&frame, f64::from(i) * 33.3);
        assert_ne!(detection.result().unwrap().state, AlertState::Alerted);
    }
}

#[test]
fn test_sustained_droop_alerts() {
    let mut session = DetectionSession::new(SessionConfig::facial(), FacialAsymmetryExtractor::default()).unwrap();
    let level = FaceObservation::new(face(0.0), FRAME, FRAME);
    let drooped = FaceObservation::new(face(0.05), FRAME, FRAME);
    let missing = FaceObservation::no_face(FRAME, FRAME);

    let mut t = 0.0;
    for _ in 0..60 {
        session.detect_frame(&level, t);
        t += 33.3;
    }
    assert_eq!(session.state(), AlertState::Monitoring);

    let mut alerted_after = None;
    for frame_index in 1..=40 {
        // Dropped frames in between must not advance the session
        assert_eq!(session.detect_frame(&missing, t), Detection::NoSignal(NoSignal::NoFace));

        let detection = session.detect_frame(&drooped, t);
        t += 33.3;
        if alerted_after.is_none() && detection.result().unwrap().state == AlertState::Alerted {
            alerted_after = Some(frame_index);
        }
    }
    assert_eq!(alerted_after, Some(17));
}

#[test]
fn test_prior_baseline_skips_calibration() {
    let config = SessionConfig {
        prior_baseline: Some(PriorBaseline::Stats {
            mean: 0.0,
            dispersion: 0.01,
        }),
        ..SessionConfig::facial()
    };
    let mut session = DetectionSession::new(config, FacialAsymmetryExtractor::default()).unwrap();
    assert_eq!(session.state(), AlertState::Monitoring);

    let drooped = FaceObservation::new(face(0.05), FRAME, FRAME);
    for i in 0..17 {
        session.detect_frame(&drooped, f64::from(i));
    }
    assert_eq!(session.state(), AlertState::Alerted);
}

#[test]
fn test_rejected_prior_leaves_session_unchanged() {
    let mut session = DetectionSession::new(SessionConfig::facial(), FacialAsymmetryExtractor::default()).unwrap();
    let level = FaceObservation::new(face(0.0), FRAME, FRAME);
    for i in 0..10 {
        session.detect_frame(&level, f64::from(i));
    }

    assert!(session.load_baseline(&PriorBaseline::Samples(Vec::new())).is_err());
    assert_eq!(session.baseline().len(), 10);
    assert_eq!(session.state(), AlertState::Calibrating);

    // A partial prior keeps calibrating live until the window fills
    session
        .load_baseline(&PriorBaseline::Samples(vec![0.0; 30]))
        .unwrap();
    assert_eq!(session.baseline().len(), 30);
    assert_eq!(session.state(), AlertState::Calibrating);
}
