//! Representation-agnostic storage and conversion between representations.

use std::fmt;
use std::str::FromStr;

use strata_core::{element_count, with_element, DType, Element, Scalar, StorageError};

use crate::any::AnyList;
use crate::buffer::copy_shape;
use crate::config::StorageConfig;
use crate::dense::DenseStorage;

/// Which physical representation a [`Storage`] uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Contiguous row-major buffer.
    Dense,
    /// Nested ordered lists holding only non-default elements.
    List,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense => f.write_str("dense"),
            Self::List => f.write_str("list"),
        }
    }
}

impl FromStr for StorageType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dense" => Ok(Self::Dense),
            "list" => Ok(Self::List),
            other => Err(StorageError::InvalidConfig {
                reason: format!("unknown storage type '{other}'"),
            }),
        }
    }
}

/// Storage in either representation.
#[derive(Debug)]
pub enum Storage {
    /// Dense storage.
    Dense(DenseStorage),
    /// Sparse list storage.
    List(AnyList),
}

impl Storage {
    /// The representation in use.
    pub fn stype(&self) -> StorageType {
        match self {
            Self::Dense(_) => StorageType::Dense,
            Self::List(_) => StorageType::List,
        }
    }

    /// Element type.
    pub fn dtype(&self) -> DType {
        match self {
            Self::Dense(d) => d.dtype(),
            Self::List(l) => l.dtype(),
        }
    }

    /// Per-dimension extents.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Dense(d) => d.shape(),
            Self::List(l) => l.shape(),
        }
    }

    /// The element at `coords`, dtype-erased.
    pub fn get(&self, coords: &[usize]) -> Scalar {
        match self {
            Self::Dense(d) => d.scalar_at(d.offset(coords)),
            Self::List(l) => l.get(coords),
        }
    }

    /// Store `value` (converted to this storage's dtype) at `coords`.
    pub fn set(&mut self, coords: &[usize], value: Scalar) {
        match self {
            Self::Dense(d) => write_scalar(d, coords, value),
            Self::List(l) => l.set(coords, value),
        }
    }

    /// Independent deep copy.
    pub fn copy(&self) -> Result<Storage, StorageError> {
        match self {
            Self::Dense(d) => d.copy().map(Storage::Dense),
            Self::List(l) => Ok(Storage::List(l.clone())),
        }
    }

    /// Convert to dense storage of `dtype`.
    ///
    /// Coordinates a list source does not store take its default value.
    pub fn to_dense(&self, dtype: DType) -> Result<DenseStorage, StorageError> {
        self.to_dense_with_config(dtype, &StorageConfig::default())
    }

    /// Convert to dense storage of `dtype`.
    pub fn to_dense_with_config(
        &self,
        dtype: DType,
        config: &StorageConfig,
    ) -> Result<DenseStorage, StorageError> {
        match self {
            Self::Dense(d) => d.cast_copy_with_config(dtype, config),
            Self::List(l) => {
                let shape = copy_shape(l.shape(), config)?;
                let mut fill = vec![0u8; dtype.size()];
                with_element!(dtype, T => l.default_value().to_element::<T>().write_bytes(&mut fill));
                let mut dense = DenseStorage::with_config(dtype, shape, fill, config)?;
                l.for_each_entry(|coords, v| write_scalar(&mut dense, coords, v));
                Ok(dense)
            }
        }
    }

    /// Convert to list storage of `dtype`.
    ///
    /// A dense source becomes a list whose unstored coordinates read as
    /// `default`; elements equal to it (after conversion) are not stored.
    /// A list source keeps its own default and is cast to `dtype`.
    pub fn to_list(&self, dtype: DType, default: Scalar) -> Result<AnyList, StorageError> {
        self.to_list_with_config(dtype, default, &StorageConfig::default())
    }

    /// Convert to list storage of `dtype`.
    ///
    /// `config` is validated first and governs the shape copy taken from
    /// a dense source.
    pub fn to_list_with_config(
        &self,
        dtype: DType,
        default: Scalar,
        config: &StorageConfig,
    ) -> Result<AnyList, StorageError> {
        config.validate()?;
        match self {
            Self::Dense(d) => {
                let shape = copy_shape(d.shape(), config)?;
                let mut list = AnyList::new(dtype, shape, default)?;
                for index in 0..d.count() {
                    list.set(&d.coord_of(index), d.scalar_at(index));
                }
                Ok(list)
            }
            Self::List(l) => Ok(l.cast(dtype)),
        }
    }

    /// Element-wise numeric equality across representations and dtypes.
    pub fn eq_storage(&self, other: &Storage) -> bool {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.eq_storage(b),
            (Self::List(a), Self::List(b)) => a.eq_any(b),
            (Self::Dense(d), Self::List(l)) | (Self::List(l), Self::Dense(d)) => {
                d.shape() == l.shape()
                    && (0..d.count()).all(|i| d.scalar_at(i) == l.get(&d.coord_of(i)))
            }
        }
    }

    /// Number of elements the shape describes.
    pub fn count(&self) -> usize {
        element_count(self.shape()).unwrap_or(usize::MAX)
    }
}

fn write_scalar(dense: &mut DenseStorage, coords: &[usize], value: Scalar) {
    with_element!(dense.dtype(), T => {
        let mut bytes = [0u8; 8];
        value.to_element::<T>().write_bytes(&mut bytes);
        dense.set(coords, &bytes[..T::SIZE]);
    })
}

impl From<DenseStorage> for Storage {
    fn from(storage: DenseStorage) -> Self {
        Self::Dense(storage)
    }
}

impl From<AnyList> for Storage {
    fn from(storage: AnyList) -> Self {
        Self::List(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn stype_and_dtype() {
        let dense = Storage::from(DenseStorage::zeros(DType::Int8, smallvec![3]).unwrap());
        assert_eq!(dense.stype(), StorageType::Dense);
        assert_eq!(dense.dtype(), DType::Int8);
        assert_eq!(dense.stype().to_string(), "dense");
        assert_eq!("list".parse::<StorageType>().unwrap(), StorageType::List);
        assert!("yale".parse::<StorageType>().is_err());

        let list = Storage::from(AnyList::new(DType::Float64, smallvec![4], Scalar::Int(0)).unwrap());
        assert_eq!(list.stype(), StorageType::List);
        assert_eq!(list.dtype(), DType::Float64);
    }

    #[test]
    fn shape_and_rank_for_both_representations() {
        let dense = Storage::from(DenseStorage::zeros(DType::Int32, smallvec![3, 2, 8]).unwrap());
        let list =
            Storage::from(AnyList::new(DType::Int32, smallvec![3, 2, 8], Scalar::Int(0)).unwrap());
        for s in [&dense, &list] {
            assert_eq!(s.shape(), &[3, 2, 8]);
            assert_eq!(s.count(), 48);
        }
    }

    #[test]
    fn scalar_set_and_get_both_representations() {
        let mut dense = Storage::from(DenseStorage::zeros(DType::Int16, smallvec![2, 2]).unwrap());
        let mut list =
            Storage::from(AnyList::new(DType::Int16, smallvec![2, 2], Scalar::Int(0)).unwrap());
        for s in [&mut dense, &mut list] {
            s.set(&[0, 1], Scalar::Int(1));
            assert_eq!(s.get(&[0, 1]), Scalar::Int(1));
            assert_eq!(s.get(&[1, 1]), Scalar::Int(0));
        }
        assert!(dense.eq_storage(&list));
    }

    #[test]
    fn list_to_dense_fills_default() {
        let mut list = AnyList::new(DType::Int32, smallvec![2, 3], Scalar::Int(1)).unwrap();
        list.set(&[1, 2], Scalar::Int(9));
        let dense = Storage::from(list).to_dense(DType::Float64).unwrap();
        assert_eq!(
            dense.to_vec::<f64>().unwrap(),
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 9.0]
        );
    }

    #[test]
    fn dense_to_list_skips_default_elements() {
        let dense = DenseStorage::from_elements::<i32>(smallvec![2, 2], &[0, 3, 0, 4]).unwrap();
        let source = Storage::from(dense);
        let list = source.to_list(DType::Int64, Scalar::Int(0)).unwrap();
        assert_eq!(list.count_stored(), 2);
        assert_eq!(list.get(&[0, 1]), Scalar::Int(3));
        assert!(source.eq_storage(&Storage::from(list)));
    }

    #[test]
    fn dense_list_dense_round_trip() {
        let dense = DenseStorage::from_elements::<f32>(smallvec![3, 3], &[0.5, 0.0, 2.0]).unwrap();
        let expected = dense.to_vec::<f32>().unwrap();
        let source = Storage::from(dense);
        let list = Storage::from(source.to_list(DType::Float32, Scalar::Float(0.0)).unwrap());
        assert_eq!(list.stype(), StorageType::List);
        let back = list.to_dense(DType::Float32).unwrap();
        assert_eq!(back.to_vec::<f32>().unwrap(), expected);
    }

    #[test]
    fn rank_zero_dense_cannot_become_list() {
        let dense = Storage::from(DenseStorage::zeros(DType::Byte, smallvec![]).unwrap());
        assert_eq!(
            dense.to_list(DType::Byte, Scalar::Int(0)).unwrap_err(),
            StorageError::InvalidRank { rank: 0 }
        );
    }

    #[test]
    fn copy_is_independent() {
        let original = Storage::from(DenseStorage::filled::<f64>(smallvec![2, 3], 1.1).unwrap());
        let mut copy = original.copy().unwrap();
        copy.set(&[0, 0], Scalar::Float(3.0));
        assert_eq!(original.get(&[0, 0]), Scalar::Float(1.1));
        assert!(!original.eq_storage(&copy));
    }

    #[test]
    fn negative_zero_survives_dense_list_dense() {
        let dense = DenseStorage::from_elements::<f64>(smallvec![2], &[-0.0, 1.0]).unwrap();
        let before = dense.as_bytes().to_vec();
        let list = Storage::from(dense)
            .to_list(DType::Float64, Scalar::Float(0.0))
            .unwrap();
        assert_eq!(list.count_stored(), 2);
        let back = Storage::from(list).to_dense(DType::Float64).unwrap();
        assert_eq!(back.as_bytes(), &before[..]);
    }

    #[test]
    fn to_list_with_config_rejects_invalid_config() {
        let dense = Storage::from(DenseStorage::zeros(DType::Byte, smallvec![2, 2]).unwrap());
        let config = StorageConfig::with_max_buffer_bytes(0);
        assert!(matches!(
            dense.to_list_with_config(DType::Byte, Scalar::Int(0), &config),
            Err(StorageError::InvalidConfig { .. })
        ));
        let list = dense
            .to_list_with_config(DType::Byte, Scalar::Int(0), &StorageConfig::default())
            .unwrap();
        assert_eq!(list.shape(), &[2, 2]);
    }

    #[test]
    fn to_dense_respects_allocation_limit() {
        let list = Storage::from(AnyList::new(DType::Float64, smallvec![100, 100], Scalar::Int(0)).unwrap());
        let config = StorageConfig::with_max_buffer_bytes(1024);
        assert!(matches!(
            list.to_dense_with_config(DType::Float64, &config),
            Err(StorageError::AllocationFailed { .. })
        ));
    }
}
