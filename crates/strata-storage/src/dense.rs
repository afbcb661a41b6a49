//! Dense row-major storage.
//!
//! A [`DenseStorage`] is a flat byte buffer holding every element of an
//! n-dimensional array, last dimension fastest-varying, plus the shape
//! that describes it. Element bytes are native-endian and laid out
//! exactly like a `[T]` slice of the storage's element type.
//!
//! Coordinates are not bounds-checked in release builds: respecting the
//! shape is the caller's contract.

use strata_core::{element_count, with_element, Coord, DType, Element, Scalar, Shape, StorageError};

use crate::buffer::{alloc_zeroed, buffer_len, copy_shape};
use crate::config::StorageConfig;

/// Contiguous storage for every element of an array.
///
/// Invariant: `elements.len() == element_count(shape) * dtype.size()`.
#[derive(Debug)]
pub struct DenseStorage {
    dtype: DType,
    shape: Shape,
    elements: Vec<u8>,
}

impl DenseStorage {
    /// Build a storage from an initial byte buffer, using the default config.
    ///
    /// See [`with_config`](Self::with_config).
    pub fn new(dtype: DType, shape: Shape, initial: Vec<u8>) -> Result<Self, StorageError> {
        Self::with_config(dtype, shape, initial, &StorageConfig::default())
    }

    /// Build a storage from an initial byte buffer.
    ///
    /// `initial` holds `initial.len() / dtype.size()` elements:
    ///
    /// - exactly the element count: the buffer is adopted without copying;
    /// - any other non-zero count: a new buffer is allocated and the
    ///   initial elements are repeated end to end to fill it, the last
    ///   repetition truncated;
    /// - empty: a new zero-filled buffer is allocated.
    ///
    /// The initial buffer is consumed in every case.
    pub fn with_config(
        dtype: DType,
        shape: Shape,
        initial: Vec<u8>,
        config: &StorageConfig,
    ) -> Result<Self, StorageError> {
        let size = dtype.size();
        if initial.len() % size != 0 {
            return Err(StorageError::MisalignedBuffer {
                len: initial.len(),
                element_size: size,
            });
        }
        let count = element_count(&shape).ok_or(StorageError::AllocationFailed {
            requested: usize::MAX,
            limit: config.max_buffer_bytes,
        })?;

        if initial.len() / size == count {
            return Ok(Self {
                dtype,
                shape,
                elements: initial,
            });
        }

        let mut elements = alloc_zeroed(buffer_len(count, dtype, config)?, config)?;
        if !initial.is_empty() {
            for chunk in elements.chunks_mut(initial.len()) {
                chunk.copy_from_slice(&initial[..chunk.len()]);
            }
        }
        Ok(Self {
            dtype,
            shape,
            elements,
        })
    }

    /// A zero-filled storage.
    pub fn zeros(dtype: DType, shape: Shape) -> Result<Self, StorageError> {
        Self::new(dtype, shape, Vec::new())
    }

    /// Build a storage of `T` elements, tiling `initial` as in
    /// [`with_config`](Self::with_config).
    pub fn from_elements<T: Element>(shape: Shape, initial: &[T]) -> Result<Self, StorageError> {
        let mut bytes = alloc_zeroed(
            buffer_len(initial.len(), T::DTYPE, &StorageConfig::default())?,
            &StorageConfig::default(),
        )?;
        for (value, out) in initial.iter().zip(bytes.chunks_exact_mut(T::SIZE)) {
            value.write_bytes(out);
        }
        Self::new(T::DTYPE, shape, bytes)
    }

    /// A storage with every element set to `value`.
    pub fn filled<T: Element>(shape: Shape, value: T) -> Result<Self, StorageError> {
        Self::from_elements(shape, &[value])
    }

    /// Element type of this storage.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Per-dimension extents.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements (product of the shape).
    pub fn count(&self) -> usize {
        self.elements.len() / self.dtype.size()
    }

    /// The raw element buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.elements
    }

    /// Row-major linear offset of `coords`, in elements.
    ///
    /// Strides are computed on the fly from the shape.
    pub fn offset(&self, coords: &[usize]) -> usize {
        debug_assert_eq!(coords.len(), self.rank(), "coordinate rank mismatch");
        coords
            .iter()
            .enumerate()
            .map(|(k, &c)| c * self.shape[k + 1..].iter().product::<usize>())
            .sum()
    }

    /// Inverse of [`offset`](Self::offset).
    pub fn coord_of(&self, mut offset: usize) -> Coord {
        let mut coord: Coord = smallvec::smallvec![0; self.rank()];
        for (k, &extent) in self.shape.iter().enumerate().rev() {
            if extent == 0 {
                continue;
            }
            coord[k] = offset % extent;
            offset /= extent;
        }
        coord
    }

    /// The bytes of the element at `coords`.
    pub fn get(&self, coords: &[usize]) -> &[u8] {
        let size = self.dtype.size();
        let start = self.offset(coords) * size;
        &self.elements[start..start + size]
    }

    /// Overwrite the element at `coords` with the first `dtype.size()`
    /// bytes of `value`. `value` is only read.
    pub fn set(&mut self, coords: &[usize], value: &[u8]) {
        let size = self.dtype.size();
        let start = self.offset(coords) * size;
        self.elements[start..start + size].copy_from_slice(&value[..size]);
    }

    /// Typed read of the element at `coords`.
    pub fn get_as<T: Element>(&self, coords: &[usize]) -> Result<T, StorageError> {
        self.check_dtype::<T>()?;
        Ok(T::read_bytes(self.get(coords)))
    }

    /// Typed write of the element at `coords`.
    pub fn set_as<T: Element>(&mut self, coords: &[usize], value: T) -> Result<(), StorageError> {
        self.check_dtype::<T>()?;
        let start = self.offset(coords) * T::SIZE;
        value.write_bytes(&mut self.elements[start..start + T::SIZE]);
        Ok(())
    }

    /// The element at linear `index`, dtype-erased.
    pub fn scalar_at(&self, index: usize) -> Scalar {
        with_element!(self.dtype, T => {
            T::read_bytes(&self.elements[index * T::SIZE..]).to_scalar()
        })
    }

    /// All elements in row-major order.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, StorageError> {
        self.check_dtype::<T>()?;
        Ok(self
            .elements
            .chunks_exact(T::SIZE)
            .map(T::read_bytes)
            .collect())
    }

    /// Duplicate this storage into an independently owned buffer.
    pub fn copy(&self) -> Result<Self, StorageError> {
        self.copy_with_config(&StorageConfig::default())
    }

    /// Duplicate this storage into an independently owned buffer.
    pub fn copy_with_config(&self, config: &StorageConfig) -> Result<Self, StorageError> {
        let shape = copy_shape(&self.shape, config)?;
        let mut copy = Self::with_config(self.dtype, shape, Vec::new(), config)?;
        if !self.elements.is_empty() {
            copy.elements.copy_from_slice(&self.elements);
        }
        Ok(copy)
    }

    /// A copy with every element converted to `dtype` (`as` semantics).
    pub fn cast_copy(&self, dtype: DType) -> Result<Self, StorageError> {
        self.cast_copy_with_config(dtype, &StorageConfig::default())
    }

    /// A copy with every element converted to `dtype` (`as` semantics).
    pub fn cast_copy_with_config(
        &self,
        dtype: DType,
        config: &StorageConfig,
    ) -> Result<Self, StorageError> {
        let shape = copy_shape(&self.shape, config)?;
        let mut out = Self::with_config(dtype, shape, Vec::new(), config)?;
        with_element!(self.dtype, S => with_element!(dtype, D => {
            cast_elements::<S, D>(&self.elements, &mut out.elements)
        }));
        Ok(out)
    }

    /// Numeric element-wise equality, across dtypes. Shapes must match.
    pub fn eq_storage(&self, other: &Self) -> bool {
        self.shape == other.shape
            && (0..self.count()).all(|i| self.scalar_at(i) == other.scalar_at(i))
    }

    /// Release a storage. `None` is accepted and ignored, so a failed
    /// construction can be passed straight through.
    pub fn delete(storage: Option<Self>) {
        drop(storage);
    }

    fn check_dtype<T: Element>(&self) -> Result<(), StorageError> {
        if T::DTYPE != self.dtype {
            return Err(StorageError::DTypeMismatch {
                expected: self.dtype,
                actual: T::DTYPE,
            });
        }
        Ok(())
    }
}

fn cast_elements<S: Element, D: Element>(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(S::SIZE).zip(dst.chunks_exact_mut(D::SIZE)) {
        S::read_bytes(s).cast::<D>().write_bytes(d);
    }
}
