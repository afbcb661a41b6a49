//! Fallible allocation of element buffers and shape arrays.
//!
//! All storage allocations go through here so that a refused request
//! surfaces as [`StorageError::AllocationFailed`] instead of aborting.
//! Nothing is retained on failure: the partially built `Vec` is dropped
//! before the error is returned.

use strata_core::{DType, Shape, StorageError};

use crate::config::StorageConfig;

/// Byte length of a buffer holding `count` elements of `dtype`.
pub(crate) fn buffer_len(
    count: usize,
    dtype: DType,
    config: &StorageConfig,
) -> Result<usize, StorageError> {
    count
        .checked_mul(dtype.size())
        .ok_or(StorageError::AllocationFailed {
            requested: usize::MAX,
            limit: config.max_buffer_bytes,
        })
}

/// Allocate a zero-filled byte buffer of exactly `len` bytes.
pub(crate) fn alloc_zeroed(len: usize, config: &StorageConfig) -> Result<Vec<u8>, StorageError> {
    let failed = StorageError::AllocationFailed {
        requested: len,
        limit: config.max_buffer_bytes,
    };
    if len > config.max_buffer_bytes {
        return Err(failed);
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| failed)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Duplicate a shape array.
pub(crate) fn copy_shape(shape: &[usize], config: &StorageConfig) -> Result<Shape, StorageError> {
    let mut out = Shape::new();
    out.try_reserve_exact(shape.len())
        .map_err(|_| StorageError::AllocationFailed {
            requested: shape.len().saturating_mul(std::mem::size_of::<usize>()),
            limit: config.max_buffer_bytes,
        })?;
    out.extend_from_slice(shape);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_zeroed_exact_length() {
        let buf = alloc_zeroed(24, &StorageConfig::default()).unwrap();
        assert_eq!(buf.len(), 24);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn alloc_over_limit_fails() {
        let config = StorageConfig::with_max_buffer_bytes(16);
        let result = alloc_zeroed(17, &config);
        assert_eq!(
            result,
            Err(StorageError::AllocationFailed {
                requested: 17,
                limit: 16
            })
        );
    }

    #[test]
    fn exactly_limit_succeeds() {
        let config = StorageConfig::with_max_buffer_bytes(16);
        assert!(alloc_zeroed(16, &config).is_ok());
    }

    #[test]
    fn buffer_len_overflow_is_allocation_failure() {
        let result = buffer_len(usize::MAX, DType::Float64, &StorageConfig::default());
        assert!(matches!(result, Err(StorageError::AllocationFailed { .. })));
    }

    #[test]
    fn copy_shape_duplicates_values() {
        let shape = copy_shape(&[3, 2, 8], &StorageConfig::default()).unwrap();
        assert_eq!(shape.as_slice(), &[3, 2, 8]);
    }
}
