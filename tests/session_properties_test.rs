//! Behavioural properties of the detection session state machine

use fast_screening::config::SessionConfig;
use fast_screening::features::speech::SpeechRateExtractor;
use fast_screening::session::{AlertState, Detection, DetectionSession, ResetOptions};
use fast_screening::constants::{FACIAL_BASELINE_CAPACITY, FACIAL_MIN_THRESHOLD, FACIAL_PERSIST_LIMIT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// The engine is modality agnostic; signals are pushed directly.
fn signal_session() -> DetectionSession<SpeechRateExtractor> {
    DetectionSession::new(SessionConfig::facial(), SpeechRateExtractor).unwrap()
}

fn feed(session: &mut DetectionSession<SpeechRateExtractor>, value: f64, count: usize) -> Vec<Detection> {
    (0..count).map(|_| session.process_signal(value, 0.0)).collect()
}

fn state_of(detection: &Detection) -> AlertState {
    detection.result().unwrap().state
}

#[test]
fn test_monitoring_after_exactly_base_n() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut session = signal_session();

    for i in 1..=FACIAL_BASELINE_CAPACITY {
        let detection = session.process_signal(rng.gen_range(-0.05..0.05), i as f64);
        let expected = if i < FACIAL_BASELINE_CAPACITY {
            AlertState::Calibrating
        } else {
            AlertState::Monitoring
        };
        assert_eq!(state_of(&detection), expected, "wrong state after {i} pushes");
    }
    assert!(session.recent().is_empty());
}

#[test]
fn test_reference_alert_scenario() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);
    assert_eq!(session.state(), AlertState::Monitoring);

    for tick in 1..=18 {
        let detection = session.process_signal(0.5, 0.0);
        let result = detection.result().unwrap();
        assert_eq!(result.threshold, FACIAL_MIN_THRESHOLD);

        let expected_counter = if tick < 10 { 0 } else { (tick - 9).min(8) };
        assert_eq!(result.persistence, expected_counter, "counter at tick {tick}");

        let expected_state = if tick >= 17 {
            AlertState::Alerted
        } else {
            AlertState::Monitoring
        };
        assert_eq!(result.state, expected_state, "state at tick {tick}");
    }

    for detection in feed(&mut session, 0.0, 50) {
        assert_eq!(state_of(&detection), AlertState::Alerted);
    }
}

#[test]
fn test_reset_after_alert_keeps_baseline() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);
    feed(&mut session, 0.5, 18);
    assert_eq!(session.state(), AlertState::Alerted);

    let baseline_before: Vec<f64> = session.baseline().iter().collect();
    session.reset(ResetOptions { reseed_baseline: false });

    assert_eq!(session.state(), AlertState::Monitoring);
    assert_eq!(session.persistence(), 0);
    assert!(session.recent().is_empty());
    assert_eq!(session.baseline().iter().collect::<Vec<_>>(), baseline_before);
}

#[test]
fn test_reseed_returns_to_calibration() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);
    feed(&mut session, 0.5, 18);

    session.reset(ResetOptions { reseed_baseline: true });
    assert_eq!(session.state(), AlertState::Calibrating);
    assert!(session.baseline().is_empty());

    let detections = feed(&mut session, 0.2, 60);
    assert_eq!(state_of(detections.last().unwrap()), AlertState::Monitoring);
}

#[test]
fn test_latch_is_monotonic() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);
    feed(&mut session, -0.4, 30);
    assert_eq!(session.state(), AlertState::Alerted);

    for detection in feed(&mut session, 0.0, 1000) {
        assert_eq!(state_of(&detection), AlertState::Alerted);
    }
    assert_eq!(session.persistence(), 0);
}

#[test]
fn test_single_spike_never_alerts() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);

    for _ in 0..20 {
        session.process_signal(0.5, 0.0);
        for detection in feed(&mut session, 0.0, 15) {
            assert_eq!(state_of(&detection), AlertState::Monitoring);
        }
    }
}

#[test]
fn test_short_runs_decay_before_limit() {
    let config = SessionConfig {
        recent_capacity: 1,
        ..SessionConfig::facial()
    };
    let mut session = DetectionSession::new(config, SpeechRateExtractor).unwrap();
    feed(&mut session, 0.0, 60);

    let run = (FACIAL_PERSIST_LIMIT - 1) as usize;
    for _ in 0..10 {
        let deviating = feed(&mut session, 0.5, run);
        assert_eq!(deviating.last().unwrap().result().unwrap().persistence, FACIAL_PERSIST_LIMIT - 1);
        feed(&mut session, 0.0, run);
        assert_eq!(session.persistence(), 0);
        assert_eq!(session.state(), AlertState::Monitoring);
    }

    // One more deviating tick than the run length does latch
    feed(&mut session, 0.5, run + 1);
    assert_eq!(session.state(), AlertState::Alerted);
}

#[test]
fn test_threshold_floor_with_constant_baseline() {
    let mut session = signal_session();
    feed(&mut session, 0.2, 60);
    assert_eq!(session.baseline().std_dev(), 0.0);
    assert_eq!(session.threshold(), FACIAL_MIN_THRESHOLD);
}

#[test]
fn test_noisy_baseline_raises_threshold() {
    let mut session = signal_session();
    for i in 0..60 {
        session.process_signal(if i % 2 == 0 { 0.05 } else { -0.05 }, 0.0);
    }
    assert!((session.threshold() - 0.15).abs() < 1e-12);
}

#[test]
fn test_drift_absorption_tracks_small_offsets() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);

    let offset = FACIAL_MIN_THRESHOLD / 4.0;
    for detection in feed(&mut session, offset, 2000) {
        assert_ne!(state_of(&detection), AlertState::Alerted);
    }

    let baseline_mean = session.baseline().mean();
    assert!(baseline_mean > offset * 0.99, "baseline mean {baseline_mean} did not follow the offset");
    assert!(baseline_mean <= offset + 1e-12);
}

#[test]
fn test_no_absorption_after_alert() {
    let mut session = signal_session();
    feed(&mut session, 0.0, 60);
    feed(&mut session, 0.5, 17);
    assert_eq!(session.state(), AlertState::Alerted);

    feed(&mut session, 0.01, 500);
    assert!(session.baseline().iter().all(|v| v == 0.0));
}

#[test]
fn test_deterministic_replay() {
    let mut rng = StdRng::seed_from_u64(42);
    let signals: Vec<f64> = (0..400)
        .map(|i| {
            let droop = if i > 200 { 0.2 } else { 0.0 };
            droop + rng.gen_range(-0.03..0.03)
        })
        .collect();

    let run = |signals: &[f64]| -> Vec<Detection> {
        let mut session = signal_session();
        signals
            .iter()
            .enumerate()
            .map(|(i, &s)| session.process_signal(s, i as f64 * 33.0))
            .collect()
    };

    let first = run(&signals);
    let second = run(&signals);
    assert_eq!(first, second);
    assert_eq!(state_of(first.last().unwrap()), AlertState::Alerted);
}
