//! Shape and coordinate aliases.

use smallvec::SmallVec;

/// Per-dimension extents of an array. `shape.len()` is the rank.
///
/// Inline capacity covers rank ≤ 4 without a heap allocation, which is
/// the common case for matrices and small tensors.
pub type Shape = SmallVec<[usize; 4]>;

/// A coordinate into an array: one index per dimension.
pub type Coord = SmallVec<[usize; 4]>;

/// Number of elements described by `shape`.
///
/// Returns `None` if the product overflows `usize`. A rank-0 shape
/// describes a single element.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
}
