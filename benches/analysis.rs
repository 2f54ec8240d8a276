//! Benchmarks for session analyses
//!
//! Covers the per-query hot paths on a synthetic full-length race:
//! - Distance alignment of a densely sampled lap
//! - Quick-lap filtering across the field
//! - Whole-field stint segmentation
//!
//! Platform: Cross-platform (synthetic data, CI-safe)

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use paddock::test_utils::{circle_samples, lap, session_with_laps};
use paddock::types::{Compound, Session};
use paddock::{DEFAULT_QUICK_LAP_THRESHOLD, LapIndex, StintSegmenter, align_by_distance};
use std::hint::black_box;

const DRIVERS: [&str; 20] = [
    "VER", "PER", "LEC", "SAI", "HAM", "RUS", "NOR", "PIA", "ALO", "STR", "GAS", "OCO", "ALB",
    "SAR", "TSU", "RIC", "BOT", "ZHO", "HUL", "MAG",
];

/// 20 drivers, 60 laps each, two-stop strategies.
fn synthetic_race() -> Session {
    let mut laps = Vec::new();
    for (d, driver) in DRIVERS.iter().enumerate() {
        for n in 1..=60u32 {
            let (stint, compound) = match n {
                1..=18 => (1, Compound::Soft),
                19..=40 => (2, Compound::Medium),
                _ => (3, Compound::Hard),
            };
            let pit_loss = if n == 18 || n == 40 { 20.0 } else { 0.0 };
            let seconds = 90.0 + d as f64 * 0.05 + (n % 7) as f64 * 0.1 + pit_loss;
            laps.push(lap(driver, n, Some(seconds), compound, stint));
        }
    }
    session_with_laps(laps)
}

fn bench_alignment(c: &mut Criterion) {
    let mut dense = lap("VER", 1, Some(90.0), Compound::Soft, 1);
    dense.samples = circle_samples(4_000, 210.0, 0.025);

    let mut group = c.benchmark_group("telemetry_alignment");
    group.throughput(Throughput::Elements(dense.samples.len() as u64));
    group.bench_function("align_by_distance_4k_samples", |b| {
        b.iter(|| black_box(align_by_distance(black_box(&dense))))
    });
    group.finish();
}

fn bench_quick_laps(c: &mut Criterion) {
    let session = synthetic_race();

    c.bench_function("quick_laps_full_field", |b| {
        b.iter(|| {
            let index = LapIndex::new(black_box(&session));
            black_box(index.quick_laps(DEFAULT_QUICK_LAP_THRESHOLD).len())
        })
    });
}

fn bench_strategy(c: &mut Criterion) {
    let session = synthetic_race();
    let segmenter = StintSegmenter::default();

    c.bench_function("strategy_full_field", |b| {
        b.iter(|| black_box(segmenter.strategy(black_box(&session))))
    });
}

criterion_group!(benches, bench_alignment, bench_quick_laps, bench_strategy);
criterion_main!(benches);
