//! Storage configuration parameters.

use strata_core::StorageError;

/// Configuration for storage allocation.
///
/// Every element buffer allocation is checked against
/// [`max_buffer_bytes`](StorageConfig::max_buffer_bytes) before the
/// allocator is asked. A request over the limit fails the same way a
/// refused allocation does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Largest single element buffer, in bytes.
    ///
    /// Default: `isize::MAX`, the largest allocation Rust permits.
    pub max_buffer_bytes: usize,
}

impl StorageConfig {
    /// Default buffer limit: the platform maximum.
    pub const DEFAULT_MAX_BUFFER_BYTES: usize = isize::MAX as usize;

    /// Create a config with the given buffer limit.
    pub fn with_max_buffer_bytes(max_buffer_bytes: usize) -> Self {
        Self { max_buffer_bytes }
    }

    /// Reject configurations that could never allocate anything.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.max_buffer_bytes == 0 {
            return Err(StorageError::InvalidConfig {
                reason: "max_buffer_bytes must be non-zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::with_max_buffer_bytes(Self::DEFAULT_MAX_BUFFER_BYTES)
    }
}
