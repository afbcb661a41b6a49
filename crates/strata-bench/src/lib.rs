//! Benchmark profiles for the Strata storage engine.
//!
//! - [`grid_profile`]: 256x256 storage, the reference size for dense ops
//! - [`sparse_profile`]: a 64x64x64 list storage with a fixed fill ratio

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::{DType, Shape, StorageError};
use strata_storage::{DenseStorage, ListStorage};
use strata_test_utils::{list_from_entries, random_entries, seeded_rng};

/// Extents of the reference dense profile.
pub const GRID: [usize; 2] = [256, 256];

/// Extents of the reference sparse profile.
pub const CUBE: [usize; 3] = [64, 64, 64];

/// A zero-filled `f64` storage with [`GRID`] extents.
pub fn grid_profile() -> Result<DenseStorage, StorageError> {
    DenseStorage::zeros(DType::Float64, GRID.iter().copied().collect::<Shape>())
}

/// A list storage over [`CUBE`] with about `fill` of its elements stored.
///
/// Entries are drawn from `seed`, so two profiles with the same arguments
/// are identical.
pub fn sparse_profile(seed: u64, fill: f64) -> ListStorage<i64> {
    let count: usize = CUBE.iter().product();
    let n = (count as f64 * fill) as usize;
    let entries = random_entries(&mut seeded_rng(seed), &CUBE, n);
    list_from_entries(&CUBE, &entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_profile_has_reference_size() {
        let grid = grid_profile().unwrap();
        assert_eq!(grid.count(), 256 * 256);
        assert_eq!(grid.as_bytes().len(), 256 * 256 * 8);
    }

    #[test]
    fn sparse_profile_is_deterministic() {
        let a = sparse_profile(42, 0.01);
        let b = sparse_profile(42, 0.01);
        assert!(a.eq_storage(&b));
        assert!(a.count_stored() > 0);
        assert!(a.count_stored() <= 2621);
    }
}
