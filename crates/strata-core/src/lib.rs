//! Core types and traits for the Strata array storage engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the element-type abstraction shared by every storage representation:
//! dtype tags, the [`Element`] capability trait, shape aliases, and
//! error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dtype;
pub mod error;
pub mod id;

pub use dtype::{DType, Element, ParseDTypeError, Scalar};
pub use error::StorageError;
pub use id::{element_count, Coord, Shape};
