//! Seeded fixtures for Strata storage tests and benchmarks.
//!
//! Every generator takes a caller-owned [`ChaCha8Rng`] so a failing
//! case can be replayed from its seed alone.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use strata_core::{Coord, Shape};
use strata_storage::{DenseStorage, ListStorage};

/// A deterministic RNG for `seed`.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A shape of `rank` dimensions, each extent in `1..=max_extent`.
pub fn random_shape(rng: &mut ChaCha8Rng, rank: usize, max_extent: usize) -> Shape {
    (0..rank).map(|_| rng.random_range(1..=max_extent)).collect()
}

/// A coordinate inside `shape`.
pub fn random_coord(rng: &mut ChaCha8Rng, shape: &[usize]) -> Coord {
    shape.iter().map(|&extent| rng.random_range(0..extent)).collect()
}

/// Up to `n` distinct coordinates inside `shape`, each with a value in
/// `-1000..=1000` other than zero.
///
/// The map is keyed by coordinate, so iteration is row-major and later
/// draws of the same coordinate overwrite earlier ones.
pub fn random_entries(rng: &mut ChaCha8Rng, shape: &[usize], n: usize) -> BTreeMap<Coord, i64> {
    let mut entries = BTreeMap::new();
    for _ in 0..n {
        let coord = random_coord(rng, shape);
        let mut value = 0;
        while value == 0 {
            value = rng.random_range(-1000..=1000);
        }
        entries.insert(coord, value);
    }
    entries
}

/// A list storage of `i64` with default zero holding `entries`.
pub fn list_from_entries(shape: &[usize], entries: &BTreeMap<Coord, i64>) -> ListStorage<i64> {
    let mut list = ListStorage::new(shape.iter().copied().collect(), 0)
        .expect("fixture shapes have rank >= 1");
    for (coord, &value) in entries {
        list.set(coord, value);
    }
    list
}

/// A dense `f64` storage where roughly `density` of the elements are
/// non-zero uniform draws in `[-1, 1)`.
pub fn random_dense_f64(rng: &mut ChaCha8Rng, shape: &[usize], density: f64) -> DenseStorage {
    let count: usize = shape.iter().product();
    let values: Vec<f64> = (0..count)
        .map(|_| {
            if rng.random_bool(density) {
                rng.random_range(-1.0..1.0)
            } else {
                0.0
            }
        })
        .collect();
    DenseStorage::from_elements(shape.iter().copied().collect(), &values)
        .expect("fixture buffers fit the default limit")
}
