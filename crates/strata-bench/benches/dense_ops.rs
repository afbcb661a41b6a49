//! Criterion micro-benchmarks for dense storage construction, access, and casts.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use smallvec::smallvec;
use strata_bench::{grid_profile, GRID};
use strata_core::DType;
use strata_storage::DenseStorage;

/// Benchmark: allocate a zero-filled 256x256 f64 storage.
fn bench_dense_alloc(c: &mut Criterion) {
    c.bench_function("dense_alloc_64k", |b| {
        b.iter(|| {
            let dense = grid_profile().unwrap();
            black_box(dense.count());
        });
    });
}

/// Benchmark: tile a 7-element pattern across 64K elements.
fn bench_dense_tile(c: &mut Criterion) {
    let pattern = [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    c.bench_function("dense_tile_64k", |b| {
        b.iter(|| {
            let dense = DenseStorage::from_elements(smallvec![256, 256], &pattern).unwrap();
            black_box(dense.as_bytes()[0]);
        });
    });
}

/// Benchmark: typed write then read of every element by coordinate.
fn bench_dense_coord_access(c: &mut Criterion) {
    let mut dense = grid_profile().unwrap();
    c.bench_function("dense_coord_access_64k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..GRID[0] {
                for j in 0..GRID[1] {
                    dense.set_as::<f64>(&[i, j], (i + j) as f64).unwrap();
                    sum += dense.get_as::<f64>(&[i, j]).unwrap();
                }
            }
            black_box(sum);
        });
    });
}

/// Benchmark: copy and cast-copy of the full grid.
fn bench_dense_copy(c: &mut Criterion) {
    let dense = grid_profile().unwrap();
    c.bench_function("dense_copy_64k", |b| {
        b.iter(|| black_box(dense.copy().unwrap()));
    });
    c.bench_function("dense_cast_f64_to_i32_64k", |b| {
        b.iter(|| black_box(dense.cast_copy(DType::Int32).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_dense_alloc,
    bench_dense_tile,
    bench_dense_coord_access,
    bench_dense_copy
);
criterion_main!(benches);
