//! Error types for the Strata storage engine.
//!
//! Logical absence (missing key, empty list) is never an error; it is
//! reported through `Option`. Errors cover allocation refusal and
//! mismatches the engine can detect cheaply.

use std::error::Error;
use std::fmt;

use crate::dtype::DType;

/// Errors from storage construction, copying and typed access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// A buffer allocation could not be satisfied. Any partial allocations
    /// made by the failing operation have already been released.
    AllocationFailed {
        /// Number of bytes requested (`usize::MAX` if the size overflowed).
        requested: usize,
        /// Largest single buffer the configuration permits.
        limit: usize,
    },
    /// Typed access with an element type that does not match the storage.
    DTypeMismatch {
        /// The storage's dtype.
        expected: DType,
        /// The dtype of the requested element type.
        actual: DType,
    },
    /// An initial byte buffer whose length is not a whole number of elements.
    MisalignedBuffer {
        /// Length of the buffer in bytes.
        len: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// Two storages with different shapes were combined.
    ShapeMismatch {
        /// Shape of the left-hand storage.
        left: Vec<usize>,
        /// Shape of the right-hand storage.
        right: Vec<usize>,
    },
    /// A rank the representation cannot hold (list storage needs rank ≥ 1).
    InvalidRank {
        /// The rejected rank.
        rank: usize,
    },
    /// A configuration value failed validation.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested, limit } => {
                write!(
                    f,
                    "allocation failed: requested {requested} bytes, limit {limit} bytes"
                )
            }
            Self::DTypeMismatch { expected, actual } => {
                write!(f, "dtype mismatch: storage is {expected}, accessed as {actual}")
            }
            Self::MisalignedBuffer { len, element_size } => {
                write!(
                    f,
                    "buffer of {len} bytes is not a multiple of the {element_size}-byte element size"
                )
            }
            Self::ShapeMismatch { left, right } => {
                write!(f, "shape mismatch: {left:?} vs {right:?}")
            }
            Self::InvalidRank { rank } => write!(f, "invalid rank {rank}"),
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for StorageError {}
