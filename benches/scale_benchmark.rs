//! Benchmark for scale derivation and frame rendering.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use healthrisk_viz::prelude::*;

fn synthetic_dataset(size: usize) -> Dataset {
    let records = (0..size)
        .map(|i| {
            let t = i as f32;
            Record::new(
                format!("State {i}"),
                format!("S{i}"),
                [
                    10.0 + (t * 0.37).sin() * 5.0,
                    35.0 + (t * 0.11).cos() * 5.0,
                    50_000.0 + (t * 0.05).sin() * 10_000.0,
                    30.0 + (t * 0.23).cos() * 4.0,
                    18.0 + (t * 0.19).sin() * 3.0,
                    12.0 + (t * 0.29).cos() * 4.0,
                ],
            )
        })
        .collect();
    Dataset::new(records)
}

fn scale_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_scale_for_field");

    for size in [50, 1_000, 100_000] {
        let dataset = synthetic_dataset(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                LinearScale::for_field(black_box(&dataset), Field::Income, (0.0, 660.0)).unwrap()
            });
        });
    }

    group.finish();
}

fn frame_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame");

    for size in [50, 1_000] {
        let mut chart = ChartController::new(synthetic_dataset(size), &Config::default()).unwrap();
        chart.click(AxisLabel::Age, Duration::ZERO);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| chart.render_svg(black_box(Duration::from_millis(500))));
        });
    }

    group.finish();
}

criterion_group!(benches, scale_benchmark, frame_benchmark);
criterion_main!(benches);
