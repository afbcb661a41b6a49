//! Strata: dense and sparse-list storage for n-dimensional numeric arrays.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Strata sub-crates. Adding `strata` as a single dependency is enough
//! for most users.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // A 2x3 Int32 array, every element 7.
//! let dense = DenseStorage::filled::<i32>(Shape::from_slice(&[2, 3]), 7).unwrap();
//! assert_eq!(dense.get_as::<i32>(&[1, 2]).unwrap(), 7);
//!
//! // The same array as a list storage with default 7 stores nothing.
//! let storage = Storage::from(dense);
//! let list = storage.to_list(DType::Int32, Scalar::Int(7)).unwrap();
//! assert_eq!(list.count_stored(), 0);
//!
//! // Writes that differ from the default are stored; cross-representation
//! // equality compares element values.
//! let mut list = Storage::from(list);
//! list.set(&[0, 1], Scalar::Int(-1));
//! assert!(!list.eq_storage(&storage));
//! assert_eq!(list.to_dense(DType::Float64).unwrap().get_as::<f64>(&[0, 1]).unwrap(), -1.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Dtype tags, the `Element` trait, shapes, errors |
//! | [`storage`] | `strata-storage` | Dense and list storage, conversion, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Dtype tags, element trait, shapes, and errors (`strata-core`).
///
/// [`types::with_element!`] maps a runtime [`types::DType`] to its Rust
/// element type for generic code.
pub use strata_core as types;

/// Dense and nested-list storage (`strata-storage`).
///
/// [`storage::DenseStorage`] keeps every element; [`storage::ListStorage`]
/// keeps only elements that differ from its default.
pub use strata_storage as storage;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use strata_core::{Coord, DType, Element, Scalar, Shape, StorageError};

    // Storage
    pub use strata_storage::{
        AnyList, DenseStorage, List, ListStorage, ListValue, Storage, StorageConfig, StorageType,
    };
}
