//! Sparse n-dimensional storage built from nested lists.
//!
//! A [`ListStorage`] stores only coordinates whose value differs from
//! its default. The root list is keyed by the first coordinate; each
//! further dimension adds one level of nesting, so a rank-`n` storage
//! walks its lists with `recursions = n - 1`.

use strata_core::{element_count, Coord, DType, Element, Shape, StorageError};

use crate::list::{List, ListValue};

/// Sparse storage of `T` elements over a fixed shape.
#[derive(Clone, Debug)]
pub struct ListStorage<T> {
    shape: Shape,
    default: T,
    rows: List<T>,
}

impl<T: Element> ListStorage<T> {
    /// An empty storage where every coordinate reads as `default`.
    ///
    /// Fails with [`StorageError::InvalidRank`] for rank 0.
    pub fn new(shape: Shape, default: T) -> Result<Self, StorageError> {
        if shape.is_empty() {
            return Err(StorageError::InvalidRank { rank: 0 });
        }
        Ok(Self {
            shape,
            default,
            rows: List::new(),
        })
    }

    /// Element type of this storage.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Per-dimension extents.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The value of every coordinate not explicitly stored.
    pub fn default_value(&self) -> T {
        self.default
    }

    /// The root list.
    pub fn rows(&self) -> &List<T> {
        &self.rows
    }

    /// Nesting depth below the root list.
    pub fn recursions(&self) -> usize {
        self.rank() - 1
    }

    /// The value at `coords`, or the default if nothing is stored there.
    pub fn get(&self, coords: &[usize]) -> T {
        debug_assert_eq!(coords.len(), self.rank(), "coordinate rank mismatch");
        let Some((&last, path)) = coords.split_last() else {
            return self.default;
        };
        let mut list = &self.rows;
        for &key in path {
            match list.find(key).map(|node| node.value()) {
                Some(ListValue::Nested(nested)) => list = nested,
                _ => return self.default,
            }
        }
        match list.find(last).map(|node| node.value()) {
            Some(ListValue::Scalar(v)) => *v,
            _ => self.default,
        }
    }

    /// Store `value` at `coords`.
    ///
    /// Storing a value bit-identical to the default removes the entry
    /// instead, pruning any nested lists left empty. `-0.0` differs from
    /// a `0.0` default and is stored.
    pub fn set(&mut self, coords: &[usize], value: T) {
        debug_assert_eq!(coords.len(), self.rank(), "coordinate rank mismatch");
        if value.same_bits(self.default) {
            self.remove(coords);
            return;
        }
        set_path(&mut self.rows, coords, value);
    }

    /// Remove the entry at `coords`, returning its value if one was stored.
    pub fn remove(&mut self, coords: &[usize]) -> Option<T> {
        remove_path(&mut self.rows, coords)
    }

    /// Number of explicitly stored elements.
    pub fn count_stored(&self) -> usize {
        let mut count = 0;
        self.rows.mark(self.recursions(), &mut |_: &T| count += 1);
        count
    }

    /// Call `f` with the coordinates and value of every stored element,
    /// in row-major order.
    pub fn for_each_entry<F: FnMut(&[usize], T)>(&self, mut f: F) {
        let mut prefix = Coord::new();
        walk_entries(&self.rows, &mut prefix, &mut f);
    }

    /// Equality with another list storage, possibly of another dtype.
    ///
    /// Shapes must match. Coordinates stored on one side only compare
    /// against the other side's default; coordinates stored on neither
    /// side compare the two defaults.
    pub fn eq_storage<R: Element>(&self, other: &ListStorage<R>) -> bool {
        if self.shape != other.shape {
            return false;
        }
        let mut checked = 0;
        if !self.rows.eq_list(
            &other.rows,
            self.default,
            other.default,
            self.recursions(),
            &mut checked,
        ) {
            return false;
        }
        checked >= self.count() || self.default.eq_element(other.default)
    }

    /// Whether every coordinate, stored or not, equals `value`.
    pub fn eq_value<U: Element>(&self, value: U) -> bool {
        let mut checked = 0;
        self.rows.eq_value(value, self.recursions(), &mut checked)
            && (checked >= self.count() || self.default.eq_element(value))
    }

    /// A copy with the default and every stored element converted to `U`.
    ///
    /// Entries are copied structurally even if they become equal to the
    /// converted default.
    pub fn cast_copy<U: Element>(&self) -> ListStorage<U> {
        ListStorage {
            shape: self.shape.clone(),
            default: self.default.cast::<U>(),
            rows: self.rows.cast_copy(self.recursions()),
        }
    }

    fn count(&self) -> usize {
        element_count(&self.shape).unwrap_or(usize::MAX)
    }
}

fn set_path<T: Element>(list: &mut List<T>, coords: &[usize], value: T) {
    let Some((&key, rest)) = coords.split_first() else {
        return;
    };
    if rest.is_empty() {
        list.insert(true, key, ListValue::Scalar(value));
        return;
    }
    match list.insert(false, key, ListValue::Nested(List::new())).value_mut() {
        ListValue::Nested(nested) => set_path(nested, rest, value),
        slot => {
            let mut nested = List::new();
            set_path(&mut nested, rest, value);
            *slot = ListValue::Nested(nested);
        }
    }
}

fn remove_path<T: Element>(list: &mut List<T>, coords: &[usize]) -> Option<T> {
    let (&key, rest) = coords.split_first()?;
    if rest.is_empty() {
        return match list.remove(key)? {
            ListValue::Scalar(v) => Some(v),
            ListValue::Nested(_) => None,
        };
    }
    let ListValue::Nested(nested) = list.find_mut(key)?.value_mut() else {
        return None;
    };
    let removed = remove_path(nested, rest);
    if nested.is_empty() {
        list.remove(key);
    }
    removed
}

fn walk_entries<T: Element, F: FnMut(&[usize], T)>(list: &List<T>, prefix: &mut Coord, f: &mut F) {
    for node in list {
        prefix.push(node.key());
        match node.value() {
            ListValue::Scalar(v) => f(prefix.as_slice(), *v),
            ListValue::Nested(nested) => walk_entries(nested, prefix, f),
        }
        prefix.pop();
    }
}
