//! Runtime-dtype dispatch over [`ListStorage`].
//!
//! The binding layer holds dtype tags, not Rust types. [`AnyList`] wraps
//! one `ListStorage<T>` per supported element type and routes every call
//! to the monomorphised implementation with a plain `match`.

use strata_core::{with_element, DType, Element, Scalar, Shape, StorageError};

use crate::list_storage::ListStorage;

/// A [`ListStorage`] of any supported dtype.
#[derive(Clone, Debug)]
pub enum AnyList {
    /// `u8` elements.
    Byte(ListStorage<u8>),
    /// `i8` elements.
    Int8(ListStorage<i8>),
    /// `i16` elements.
    Int16(ListStorage<i16>),
    /// `i32` elements.
    Int32(ListStorage<i32>),
    /// `i64` elements.
    Int64(ListStorage<i64>),
    /// `f32` elements.
    Float32(ListStorage<f32>),
    /// `f64` elements.
    Float64(ListStorage<f64>),
}

macro_rules! dispatch {
    ($list:expr, $s:ident => $body:expr) => {
        match $list {
            AnyList::Byte($s) => $body,
            AnyList::Int8($s) => $body,
            AnyList::Int16($s) => $body,
            AnyList::Int32($s) => $body,
            AnyList::Int64($s) => $body,
            AnyList::Float32($s) => $body,
            AnyList::Float64($s) => $body,
        }
    };
}

macro_rules! impl_from_list_storage {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ListStorage<$t>> for AnyList {
                fn from(storage: ListStorage<$t>) -> Self {
                    Self::$variant(storage)
                }
            }
        )*
    };
}

impl_from_list_storage!(
    u8 => Byte,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

impl AnyList {
    /// An empty storage of `dtype` whose unstored coordinates read as
    /// `default` (converted to `dtype`).
    pub fn new(dtype: DType, shape: Shape, default: Scalar) -> Result<Self, StorageError> {
        with_element!(dtype, T => {
            ListStorage::<T>::new(shape, default.to_element::<T>()).map(AnyList::from)
        })
    }

    /// Element type of the wrapped storage.
    pub fn dtype(&self) -> DType {
        dispatch!(self, s => s.dtype())
    }

    /// Per-dimension extents.
    pub fn shape(&self) -> &[usize] {
        dispatch!(self, s => s.shape())
    }

    /// The default value.
    pub fn default_value(&self) -> Scalar {
        dispatch!(self, s => s.default_value().to_scalar())
    }

    /// The value at `coords`.
    pub fn get(&self, coords: &[usize]) -> Scalar {
        dispatch!(self, s => s.get(coords).to_scalar())
    }

    /// Store `value` (converted to this dtype) at `coords`.
    pub fn set(&mut self, coords: &[usize], value: Scalar) {
        dispatch!(self, s => s.set(coords, value.to_element()))
    }

    /// Remove the entry at `coords`.
    pub fn remove(&mut self, coords: &[usize]) -> Option<Scalar> {
        dispatch!(self, s => s.remove(coords).map(Element::to_scalar))
    }

    /// Number of explicitly stored elements.
    pub fn count_stored(&self) -> usize {
        dispatch!(self, s => s.count_stored())
    }

    /// Visit every stored element in row-major order.
    pub fn for_each_entry<F: FnMut(&[usize], Scalar)>(&self, mut f: F) {
        dispatch!(self, s => s.for_each_entry(|coords, v| f(coords, v.to_scalar())))
    }

    /// A copy converted to `dtype`.
    pub fn cast(&self, dtype: DType) -> AnyList {
        dispatch!(self, s => with_element!(dtype, T => AnyList::from(s.cast_copy::<T>())))
    }

    /// Equality across dtypes; see [`ListStorage::eq_storage`].
    pub fn eq_any(&self, other: &AnyList) -> bool {
        dispatch!(self, l => dispatch!(other, r => l.eq_storage(r)))
    }

    /// Whether every coordinate equals `value`.
    pub fn eq_value(&self, value: Scalar) -> bool {
        match value {
            Scalar::Int(v) => dispatch!(self, s => s.eq_value(v)),
            Scalar::Float(v) => dispatch!(self, s => s.eq_value(v)),
        }
    }
}
