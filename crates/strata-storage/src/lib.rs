//! Dense and sparse-list storage for n-dimensional numeric arrays.
//!
//! Two physical representations share one element-type abstraction
//! from `strata-core`:
//!
//! ```text
//! Storage (representation-agnostic)
//! ├── DenseStorage: flat row-major Vec<u8>, dtype tag, shape
//! └── AnyList (runtime dtype) → ListStorage<T>
//!     └── List<T> (rows) → Node { key, ListValue::Nested(List<T>) } ...
//!         └── deepest level: ListValue::Scalar(T)
//! ```
//!
//! Dense storage keeps every element; list storage keeps only the
//! elements that differ from a per-storage default value, in nested
//! key-ordered singly linked lists, one nesting level per dimension.
//!
//! # Allocation
//!
//! Every buffer reservation goes through `try_reserve_exact` and is
//! checked against [`StorageConfig::max_buffer_bytes`], so allocation
//! failure surfaces as [`StorageError::AllocationFailed`] instead of an
//! abort.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod any;
mod buffer;
pub mod config;
pub mod dense;
pub mod list;
pub mod list_storage;
pub mod storage;

// Public re-exports for the primary API surface.
pub use any::AnyList;
pub use config::StorageConfig;
pub use dense::DenseStorage;
pub use list::{List, ListValue, Node};
pub use list_storage::ListStorage;
pub use storage::{Storage, StorageType};
pub use strata_core::StorageError;
