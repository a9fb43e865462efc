//! Benchmarks for per-frame detection cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fast_screening::{
    config::SessionConfig,
    features::facial::{FaceLandmarks, FaceObservation, FacialAsymmetryExtractor, Landmark},
    features::speech::SpeechRateExtractor,
    features::FeatureExtractor,
    session::DetectionSession,
};

fn noisy_face(droop: f64) -> FaceObservation {
    let jitter = || (rand::random::<f64>() - 0.5) * 0.002;
    let landmarks = FaceLandmarks {
        eye_left: Landmark::new(0.35 + jitter(), 0.40 + jitter()),
        eye_right: Landmark::new(0.65 + jitter(), 0.40 + jitter()),
        mouth_left: Landmark::new(0.40 + jitter(), 0.70 + jitter()),
        mouth_right: Landmark::new(0.60 + jitter(), 0.70 + droop + jitter()),
    };
    FaceObservation::new(landmarks, 640, 480)
}

fn benchmark_extraction(c: &mut Criterion) {
    let extractor = FacialAsymmetryExtractor::default();
    let frame = noisy_face(0.02);

    c.bench_function("facial_skew", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&frame))));
    });
}

fn benchmark_detect_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_frame");

    // Simulated landmark stream: calm face, then a droop
    let frames: Vec<FaceObservation> = (0..300)
        .map(|i| noisy_face(if i < 150 { 0.0 } else { 0.04 }))
        .collect();

    group.bench_with_input(BenchmarkId::new("facial_sequence", frames.len()), &frames, |b, data| {
        b.iter(|| {
            let mut session =
                DetectionSession::new(SessionConfig::facial(), FacialAsymmetryExtractor::default()).unwrap();
            for (i, frame) in data.iter().enumerate() {
                black_box(session.detect_frame(black_box(frame), i as f64 * 33.3));
            }
        });
    });

    group.finish();
}

fn benchmark_window_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_sizes");

    for baseline_capacity in [30, 60, 120, 240] {
        let config = SessionConfig {
            baseline_capacity,
            ..SessionConfig::facial()
        };
        let signals: Vec<f64> = (0..baseline_capacity + 200)
            .map(|_| (rand::random::<f64>() - 0.5) * 0.04)
            .collect();

        group.bench_with_input(BenchmarkId::new("process_signal", baseline_capacity), &signals, |b, data| {
            b.iter(|| {
                let mut session = DetectionSession::new(config.clone(), SpeechRateExtractor).unwrap();
                for &signal in data {
                    black_box(session.process_signal(black_box(signal), 0.0));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_extraction,
    benchmark_detect_frame,
    benchmark_window_sizes
);
criterion_main!(benches);
