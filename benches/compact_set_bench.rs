//! CompactSet benchmarks.
//!
//! Compares construction from unsorted and sorted input, membership by
//! binary search vs linear scan, and full iteration.
//!
//! Inputs are clustered ids: runs of 64 consecutive values separated by gaps,
//! which is the shape the layout is designed for.

use compact_set::CompactSet;
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SIZES: [i32; 4] = [100, 1000, 10000, 100000];

/// Generates `size` ascending values in runs of 64 with a gap of 3 after each run.
fn generate_clustered(size: i32) -> Vec<i32> {
    (0..size).map(|index| index + (index / 64) * 3).collect()
}

/// Returns the appropriate BatchSize based on input size.
fn batch_size_for(size: i32) -> BatchSize {
    if size < 1000 {
        BatchSize::SmallInput
    } else {
        BatchSize::LargeInput
    }
}

fn benchmark_try_from_unsorted(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compact_set_try_from_unsorted");

    for size in SIZES {
        let mut base_vec = generate_clustered(size);
        base_vec.reverse();
        group.bench_with_input(
            BenchmarkId::new("try_from", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || base_vec.clone(),
                    |values| black_box(CompactSet::try_from(black_box(values))),
                    batch_size_for(size),
                );
            },
        );
    }

    group.finish();
}

fn benchmark_from_sorted_slice(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compact_set_from_sorted_slice");

    for size in SIZES {
        let base_vec = generate_clustered(size);
        group.bench_with_input(
            BenchmarkId::new("from_sorted_slice", size),
            &base_vec,
            |bencher, values| {
                bencher.iter(|| black_box(CompactSet::from_sorted_slice(black_box(values))));
            },
        );
    }

    group.finish();
}

fn benchmark_contains(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compact_set_contains");

    for size in SIZES {
        let values = generate_clustered(size);
        let Ok(set) = CompactSet::from_sorted_slice(&values) else {
            continue;
        };
        let upper = values.last().copied().unwrap_or(0) + 1;
        let probes: Vec<i32> = (0..256).map(|index| (index * 7919) % upper).collect();

        group.bench_with_input(BenchmarkId::new("binary_search", size), &probes, |bencher, probes| {
            bencher.iter(|| {
                probes
                    .iter()
                    .filter(|&&probe| set.contains(black_box(probe)))
                    .count()
            });
        });
        group.bench_with_input(BenchmarkId::new("linear_scan", size), &probes, |bencher, probes| {
            bencher.iter(|| {
                probes
                    .iter()
                    .filter(|&&probe| set.contains_by_scan(black_box(probe)))
                    .count()
            });
        });
    }

    group.finish();
}

fn benchmark_iterate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compact_set_iterate");

    for size in SIZES {
        let Ok(set) = CompactSet::from_sorted_slice(&generate_clustered(size)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("sum", size), &set, |bencher, set| {
            bencher.iter(|| black_box(set.iter().map(i64::from).sum::<i64>()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_try_from_unsorted,
    benchmark_from_sorted_slice,
    benchmark_contains,
    benchmark_iterate
);
criterion_main!(benches);
