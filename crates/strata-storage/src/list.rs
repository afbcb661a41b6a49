//! Ordered singly-linked lists, optionally nested.
//!
//! A [`List`] maps `usize` keys to [`ListValue`]s in strictly ascending
//! key order with no duplicates. Values are either scalars or further
//! lists; an n-dimensional sparse array is a list nested `n - 1` times.
//!
//! Operations that walk the nesting take a `recursions` argument: the
//! number of list levels remaining below the current one before values
//! are scalars. A value whose variant disagrees with `recursions` is a
//! caller error. It is never a panic: comparisons report inequality,
//! and debug builds print a diagnostic.

use std::fmt;

use strata_core::Element;

/// A value stored in a list node.
#[derive(Clone, Debug)]
pub enum ListValue<T> {
    /// A single element (at `recursions == 0`).
    Scalar(T),
    /// A nested list (at `recursions > 0`).
    Nested(List<T>),
}

impl<T> ListValue<T> {
    /// The scalar, if this is one.
    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Nested(_) => None,
        }
    }

    /// The nested list, if this is one.
    pub fn as_list(&self) -> Option<&List<T>> {
        match self {
            Self::Nested(list) => Some(list),
            Self::Scalar(_) => None,
        }
    }
}

impl<T: Element> ListValue<T> {
    /// Compare against a single value, recursing into nested lists.
    fn eq_value<U: Element>(&self, value: U, recursions: usize, checked: &mut usize) -> bool {
        match self {
            Self::Scalar(v) if recursions == 0 => {
                *checked += 1;
                v.eq_element(value)
            }
            Self::Nested(list) if recursions > 0 => list.eq_value(value, recursions - 1, checked),
            _ => {
                depth_mismatch("eq_value", recursions);
                false
            }
        }
    }

    fn eq_list_value<R: Element>(
        &self,
        right: &ListValue<R>,
        left_default: T,
        right_default: R,
        recursions: usize,
        checked: &mut usize,
    ) -> bool {
        match (self, right) {
            (Self::Scalar(l), ListValue::Scalar(r)) if recursions == 0 => {
                *checked += 1;
                l.eq_element(*r)
            }
            (Self::Nested(l), ListValue::Nested(r)) if recursions > 0 => {
                l.eq_list(r, left_default, right_default, recursions - 1, checked)
            }
            _ => {
                depth_mismatch("eq_list", recursions);
                false
            }
        }
    }

    fn cast_value<U: Element>(&self, recursions: usize) -> ListValue<U> {
        match self {
            Self::Scalar(v) => {
                if recursions != 0 {
                    depth_mismatch("cast_copy", recursions);
                }
                ListValue::Scalar(v.cast::<U>())
            }
            Self::Nested(list) => {
                if recursions == 0 {
                    depth_mismatch("cast_copy", recursions);
                }
                ListValue::Nested(list.cast_copy(recursions.saturating_sub(1)))
            }
        }
    }
}

/// One entry of a [`List`].
pub struct Node<T> {
    key: usize,
    val: ListValue<T>,
    next: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    /// The coordinate index this node holds at its list's level.
    pub fn key(&self) -> usize {
        self.key
    }

    /// The stored value.
    pub fn value(&self) -> &ListValue<T> {
        &self.val
    }

    /// The stored value, mutably.
    pub fn value_mut(&mut self) -> &mut ListValue<T> {
        &mut self.val
    }

    /// The following node, if any.
    pub fn next(&self) -> Option<&Node<T>> {
        self.next.as_deref()
    }

    /// Insert a node directly after this one without scanning.
    ///
    /// The caller guarantees `self.key < key < next.key`; debug builds
    /// assert it.
    pub fn insert_after(&mut self, key: usize, val: ListValue<T>) -> &mut Node<T> {
        debug_assert!(key > self.key, "insert_after key must follow this node");
        debug_assert!(
            self.next.as_ref().is_none_or(|next| key < next.key),
            "insert_after key must precede the next node"
        );
        let next = self.next.take();
        self.next.insert(Box::new(Node { key, val, next }))
    }

    /// Scanning forward from this node, the last node whose successor is
    /// absent or has a key `>= key`. Returns `self` if the very next node
    /// already reaches `key`.
    pub fn find_preceding_from(&self, key: usize) -> &Node<T> {
        let mut prev = self;
        while let Some(next) = prev.next.as_deref() {
            if key <= next.key {
                break;
            }
            prev = next;
        }
        prev
    }

    /// Scanning forward from this node, the node with exactly `key`, or
    /// failing that the closest node with a smaller key.
    ///
    /// Assumes `self.key <= key`; otherwise `self` is returned.
    pub fn find_nearest_from(&self, key: usize) -> &Node<T> {
        if self.key == key {
            return self;
        }
        let prev = self.find_preceding_from(key);
        match prev.next.as_deref() {
            Some(next) if next.key == key => next,
            _ => prev,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("val", &self.val)
            .finish_non_exhaustive()
    }
}

type Link<T> = Option<Box<Node<T>>>;

/// A key-ordered singly-linked list.
///
/// The list exclusively owns its node chain; dropping it releases every
/// node (and every nested list) without recursion along the chain.
pub struct List<T> {
    first: Link<T>,
}

impl<T> List<T> {
    /// An empty list.
    pub fn new() -> Self {
        Self { first: None }
    }

    /// The first (lowest-key) node.
    pub fn first(&self) -> Option<&Node<T>> {
        self.first.as_deref()
    }

    /// The first node, mutably.
    pub fn first_mut(&mut self) -> Option<&mut Node<T>> {
        self.first.as_deref_mut()
    }

    /// Whether the list has no nodes.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Number of nodes at this level.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterate over nodes in ascending key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.first.as_deref(),
        }
    }

    /// The link slot holding the first node with key `>= key`.
    fn seek_mut(&mut self, key: usize) -> &mut Link<T> {
        let mut link = &mut self.first;
        while link.as_ref().is_some_and(|node| node.key < key) {
            if let Some(node) = link {
                link = &mut node.next;
            }
        }
        link
    }

    /// Insert `val` at `key`, keeping keys ordered.
    ///
    /// If `key` is already present, its value is overwritten when
    /// `replace` is true; otherwise the existing value is kept and `val`
    /// is dropped. Returns the node holding `key` either way.
    pub fn insert(&mut self, replace: bool, key: usize, val: ListValue<T>) -> &mut Node<T> {
        let link = self.seek_mut(key);
        match link.take() {
            Some(mut node) if node.key == key => {
                if replace {
                    node.val = val;
                }
                &mut **link.insert(node)
            }
            next => &mut **link.insert(Box::new(Node { key, val, next })),
        }
    }

    /// Unlink the node at `key` and hand its value to the caller.
    ///
    /// Returns `None`, leaving the list unchanged, if `key` is absent.
    pub fn remove(&mut self, key: usize) -> Option<ListValue<T>> {
        let link = self.seek_mut(key);
        match link.take() {
            Some(node) if node.key == key => {
                let Node { val, next, .. } = *node;
                *link = next;
                Some(val)
            }
            other => {
                *link = other;
                None
            }
        }
    }

    /// The node with exactly `key`. Stops scanning once a larger key is
    /// passed.
    pub fn find(&self, key: usize) -> Option<&Node<T>> {
        self.iter()
            .take_while(|node| node.key <= key)
            .find(|node| node.key == key)
    }

    /// The node with exactly `key`, mutably.
    pub fn find_mut(&mut self, key: usize) -> Option<&mut Node<T>> {
        self.seek_mut(key)
            .as_deref_mut()
            .filter(|node| node.key == key)
    }

    /// The node with exactly `key`, or the closest node with a smaller key.
    ///
    /// Returns `None` if the list is empty or every key exceeds `key`.
    pub fn find_nearest(&self, key: usize) -> Option<&Node<T>> {
        let first = self.first.as_deref()?;
        if first.key > key {
            return None;
        }
        Some(first.find_nearest_from(key))
    }

    /// Release the list, descending `recursions` levels into nested lists.
    pub fn delete(mut self, recursions: usize) {
        let mut cur = self.first.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
            match node.val {
                ListValue::Nested(list) if recursions > 0 => list.delete(recursions - 1),
                ListValue::Scalar(_) if recursions == 0 => {}
                _ => depth_mismatch("delete", recursions),
            }
        }
    }

    /// Visit every reachable scalar, descending `recursions` levels.
    ///
    /// Structure is not modified. A host that manages element lifetimes
    /// itself uses this to keep referenced values alive.
    pub fn mark<F: FnMut(&T)>(&self, recursions: usize, visit: &mut F) {
        for node in self {
            match &node.val {
                ListValue::Nested(list) if recursions > 0 => list.mark(recursions - 1, visit),
                ListValue::Scalar(v) if recursions == 0 => visit(v),
                _ => depth_mismatch("mark", recursions),
            }
        }
    }
}

impl<T: Element> List<T> {
    /// Recursive equality against another list, possibly of another
    /// element type.
    ///
    /// A key present on only one side is compared against the other
    /// side's default value. `checked` is incremented once per scalar
    /// position compared, so the caller can tell whether positions absent
    /// on both sides remain (and must then compare the two defaults).
    pub fn eq_list<R: Element>(
        &self,
        right: &List<R>,
        left_default: T,
        right_default: R,
        recursions: usize,
        checked: &mut usize,
    ) -> bool {
        let mut lhs = self.iter().peekable();
        let mut rhs = right.iter().peekable();
        loop {
            let equal = match (lhs.peek().copied(), rhs.peek().copied()) {
                (None, None) => return true,
                (Some(l), Some(r)) if l.key == r.key => {
                    lhs.next();
                    rhs.next();
                    l.val
                        .eq_list_value(&r.val, left_default, right_default, recursions, checked)
                }
                (Some(l), Some(r)) if r.key < l.key => {
                    rhs.next();
                    r.val.eq_value(left_default, recursions, checked)
                }
                (Some(l), _) => {
                    lhs.next();
                    l.val.eq_value(right_default, recursions, checked)
                }
                (None, Some(r)) => {
                    rhs.next();
                    r.val.eq_value(left_default, recursions, checked)
                }
            };
            if !equal {
                return false;
            }
        }
    }

    /// Whether every stored scalar, at any depth, equals `value`.
    pub fn eq_value<U: Element>(&self, value: U, recursions: usize, checked: &mut usize) -> bool {
        self.iter()
            .all(|node| node.val.eq_value(value, recursions, checked))
    }

    /// A structural copy with every scalar converted to `U`.
    pub fn cast_copy<U: Element>(&self, recursions: usize) -> List<U> {
        let mut out = List::new();
        let mut tail = &mut out.first;
        for node in self {
            let copied = Node {
                key: node.key,
                val: node.val.cast_value(recursions),
                next: None,
            };
            tail = &mut tail.insert(Box::new(copied)).next;
        }
        out
    }

    /// Rebuild `self` as a copy of `source`, converting each scalar from
    /// `S` to `T`. The previous contents are released.
    pub fn cast_copy_contents<S: Element>(&mut self, source: &List<S>, recursions: usize) {
        *self = source.cast_copy(recursions);
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        let mut cur = self.first.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        let mut out = List::new();
        let mut tail = &mut out.first;
        for node in self {
            let copied = Node {
                key: node.key,
                val: node.val.clone(),
                next: None,
            };
            tail = &mut tail.insert(Box::new(copied)).next;
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|node| (node.key, &node.val)))
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a Node<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the nodes of a [`List`], in ascending key order.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node)
    }
}

#[cfg(debug_assertions)]
fn depth_mismatch(op: &str, recursions: usize) {
    eprintln!("strata: list {op} found a value whose nesting disagrees with recursions={recursions}");
}

#[cfg(not(debug_assertions))]
fn depth_mismatch(_op: &str, _recursions: usize) {}
