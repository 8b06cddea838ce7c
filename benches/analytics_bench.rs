//! Performance benchmarks for the analytics pipeline
//!
//! Targets:
//! - Pattern analysis: <100us for the default 20-observation window
//! - State classification: <50us per window
//! - Full plan pipeline: <1ms per request at any realistic window size

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mathesis_core::analytics::{
    analyze_pattern, build_learning_plan, classify_state, score_effectiveness,
};
use mathesis_core::types::{
    EmotionLabel, EmotionObservation, EmotionPattern, ProgressSnapshot, Trend,
};

/// Canonical label vocabulary cycled to build synthetic windows
const VOCABULARY: [&str; 9] = [
    "very_focused",
    "focused",
    "happy",
    "excited",
    "neutral",
    "slightly_confused",
    "confused",
    "very_confused",
    "frustrated",
];

fn synthetic_labels(n: usize) -> Vec<EmotionLabel> {
    (0..n)
        .map(|i| EmotionLabel::from(VOCABULARY[i % VOCABULARY.len()]))
        .collect()
}

fn synthetic_observations(n: usize) -> Vec<EmotionObservation> {
    let base = Utc::now();
    (0..n)
        .map(|i| EmotionObservation {
            emotion: EmotionLabel::from(VOCABULARY[i % VOCABULARY.len()]),
            timestamp: base + chrono::Duration::seconds(i as i64),
        })
        .collect()
}

/// Benchmark 1: Pattern Analysis
fn bench_pattern_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_analysis");

    for window in [5usize, 20, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*window as u64));

        group.bench_with_input(
            BenchmarkId::new("analyze_pattern", window),
            window,
            |b, &window| {
                let labels = synthetic_labels(window);
                b.iter(|| {
                    let pattern = analyze_pattern(black_box(&labels), black_box(30));
                    black_box(pattern);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark 2: State Classification
fn bench_state_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_classification");

    for window in [5usize, 20, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*window as u64));

        group.bench_with_input(
            BenchmarkId::new("classify_state", window),
            window,
            |b, &window| {
                let observations = synthetic_observations(window);
                b.iter(|| {
                    let state = classify_state(black_box(&observations), black_box(30));
                    black_box(state);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark 3: Effectiveness Scoring
fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    group.throughput(Throughput::Elements(1));

    group.bench_function("score_effectiveness", |b| {
        let pattern = EmotionPattern {
            dominant: EmotionLabel::from("focused"),
            stability: 0.6,
            trend: Trend::Improving,
        };
        let progress = ProgressSnapshot {
            completed_topics: 12,
            total_topics: 44,
        };

        b.iter(|| {
            let score = score_effectiveness(black_box(&pattern), black_box(&progress)).unwrap();
            black_box(score);
        });
    });

    group.finish();
}

/// Benchmark 4: Full Plan Pipeline
fn bench_plan_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_pipeline");

    for window in [20usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*window as u64));

        group.bench_with_input(
            BenchmarkId::new("build_learning_plan", window),
            window,
            |b, &window| {
                let observations = synthetic_observations(window);
                let progress = ProgressSnapshot {
                    completed_topics: 12,
                    total_topics: 44,
                };

                b.iter(|| {
                    let plan =
                        build_learning_plan(black_box(&observations), black_box(&progress))
                            .unwrap();
                    black_box(plan);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pattern_analysis,
    bench_state_classification,
    bench_scoring,
    bench_plan_pipeline,
);

criterion_main!(benches);
