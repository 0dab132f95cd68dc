//! Criterion benchmarks for sigmat hot paths.
//!
//! Benchmarks:
//! 1. Ranking (signal and partition modes, with resets)
//! 2. Span reduction between occurrences
//! 3. Random placement with spacing
//! 4. Stop exits over a configuration sweep
//! 5. Combinators over broadcast operands

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use sigmat_core::reduce::avg_distance;
use sigmat_core::{
    and, generate_random, generate_stop_loss, rank, rank_partitions, ConfigStack, EventMatrix,
    PriceMatrix, RandomSpec, RankOptions, StopLossOptions,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_signals(n_rows: usize, n_cols: usize, seed: u64) -> EventMatrix {
    let spec = RandomSpec::new(vec![n_rows / 20, n_rows / 10]).with_min_space(2);
    generate_random((n_rows, n_cols), &spec, Some(seed)).unwrap()
}

fn make_prices(n_rows: usize, n_cols: usize) -> PriceMatrix {
    Array2::from_shape_fn((n_rows, n_cols), |(i, j)| {
        100.0 + (i as f64 * 0.1 + j as f64).sin() * 10.0
    })
}

// ── 1. Ranking ───────────────────────────────────────────────────────

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for &n_rows in &[252, 1260, 2520] {
        let m = make_signals(n_rows, 100, 1);
        let reset = make_signals(n_rows, 1, 2);

        group.bench_with_input(BenchmarkId::new("signals", n_rows), &n_rows, |b, _| {
            b.iter(|| rank(black_box(&m), &RankOptions::new()));
        });
        group.bench_with_input(BenchmarkId::new("partitions", n_rows), &n_rows, |b, _| {
            b.iter(|| rank_partitions(black_box(&m), &RankOptions::new()));
        });
        group.bench_with_input(BenchmarkId::new("signals_reset", n_rows), &n_rows, |b, _| {
            let options = RankOptions::new().reset_by(&reset).allow_gaps(true);
            b.iter(|| rank(black_box(&m), &options));
        });
    }

    group.finish();
}

// ── 2. Span Reduction ────────────────────────────────────────────────

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    let m = make_signals(2520, 100, 3);
    group.bench_function("avg_distance_2520x100", |b| {
        b.iter(|| avg_distance(black_box(&m)));
    });

    group.finish();
}

// ── 3. Random Placement ──────────────────────────────────────────────

fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_random");

    for &n_cols in &[10, 100, 1000] {
        let spec = RandomSpec::new(vec![5, 10, 20]).with_min_space(3);
        group.bench_with_input(BenchmarkId::new("1260_rows", n_cols), &n_cols, |b, &n_cols| {
            b.iter(|| generate_random((1260, n_cols), black_box(&spec), Some(7)));
        });
    }

    group.finish();
}

// ── 4. Stop Sweep ────────────────────────────────────────────────────

fn bench_stops(c: &mut Criterion) {
    let mut group = c.benchmark_group("stop_exits");

    let entries = make_signals(1260, 50, 4);
    let price = make_prices(1260, 50);
    let stops = ConfigStack::from_scalars(&[0.01, 0.02, 0.05, 0.1, 0.2]).unwrap();

    group.bench_function("fixed_5_configs", |b| {
        b.iter(|| {
            generate_stop_loss(
                black_box(&entries),
                black_box(&price),
                &stops,
                &StopLossOptions::default(),
            )
        });
    });

    let trailing = StopLossOptions {
        trailing: true,
        ..Default::default()
    };
    group.bench_function("trailing_5_configs", |b| {
        b.iter(|| generate_stop_loss(black_box(&entries), black_box(&price), &stops, &trailing));
    });

    group.finish();
}

// ── 5. Combinators ───────────────────────────────────────────────────

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");

    let a = make_signals(2520, 100, 5);
    let b_m = make_signals(2520, 100, 6);
    let filter = make_signals(2520, 1, 7);

    group.bench_function("and_broadcast_2520x100", |b| {
        b.iter(|| and(black_box(&a), &[&b_m, &filter]));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rank,
    bench_reduce,
    bench_random,
    bench_stops,
    bench_combine,
);
criterion_main!(benches);
