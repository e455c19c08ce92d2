//! B+ tree node layout.
//!
//! Nodes use fixed-capacity inline arrays plus a fill count. Nothing here
//! ever grows: a leaf holds at most [`MAX_KEYS`] entries and is split before
//! it would overflow, while an internal node has exactly one spare key slot
//! (and one spare child slot) that is only occupied between receiving a
//! promoted key and being split.

use std::mem;

use crate::common::config::MAX_KEYS;
use crate::common::Location;
use crate::index::key::IndexKey;

/// Handle of a node inside its tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

impl NodeId {
    /// Filler for unused child slots.
    pub(crate) const INVALID: NodeId = NodeId(usize::MAX);
}

/// Key slots in an internal node, including the overflow slot.
const INTERNAL_KEY_SLOTS: usize = MAX_KEYS + 1;

/// Child slots in an internal node, including the overflow slot.
const INTERNAL_CHILD_SLOTS: usize = MAX_KEYS + 2;

/// A tree node: either a leaf or an internal node, never both.
pub(crate) enum Node<K> {
    Leaf(LeafNode<K>),
    Internal(InternalNode<K>),
}

// ============================================================================
// Leaf nodes
// ============================================================================

/// Sorted `(key, location)` entries plus the link to the next leaf.
pub(crate) struct LeafNode<K> {
    len: usize,
    keys: [K; MAX_KEYS],
    locations: [Location; MAX_KEYS],
    pub(crate) next: Option<NodeId>,
}

impl<K: IndexKey> LeafNode<K> {
    pub(crate) fn new() -> Self {
        Self {
            len: 0,
            keys: std::array::from_fn(|_| K::default()),
            locations: [Location::INVALID; MAX_KEYS],
            next: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len >= MAX_KEYS
    }

    #[inline]
    pub(crate) fn keys(&self) -> &[K] {
        &self.keys[..self.len]
    }

    #[inline]
    pub(crate) fn locations(&self) -> &[Location] {
        &self.locations[..self.len]
    }

    /// Index of the first entry with key `>= key`.
    #[inline]
    pub(crate) fn lower_bound(&self, key: &K) -> usize {
        self.keys().partition_point(|k| k < key)
    }

    /// Shift-and-insert at the sorted position, after any equal keys.
    ///
    /// Returns `false` if the leaf is full.
    pub(crate) fn insert(&mut self, key: K, location: Location) -> bool {
        if self.is_full() {
            return false;
        }

        let pos = self.keys().partition_point(|k| k <= &key);
        let len = self.len;
        self.keys[pos..=len].rotate_right(1);
        self.locations[pos..=len].rotate_right(1);
        self.keys[pos] = key;
        self.locations[pos] = location;
        self.len += 1;
        true
    }

    /// Move the upper half of the entries into a new leaf.
    ///
    /// The new leaf inherits this leaf's `next`; the caller links this leaf
    /// to the new one once it has an id.
    pub(crate) fn split(&mut self) -> LeafNode<K> {
        let mid = self.len / 2;
        let mut right = LeafNode::new();

        for (dst, src) in (mid..self.len).enumerate() {
            right.keys[dst] = mem::take(&mut self.keys[src]);
            right.locations[dst] = mem::replace(&mut self.locations[src], Location::INVALID);
        }
        right.len = self.len - mid;
        right.next = self.next;
        self.len = mid;

        right
    }
}

// ============================================================================
// Internal nodes
// ============================================================================

/// `len` separator keys and `len + 1` children.
///
/// Child `i` holds keys `<= keys[i]`; the last child holds keys
/// `>= keys[len - 1]`.
pub(crate) struct InternalNode<K> {
    len: usize,
    keys: [K; INTERNAL_KEY_SLOTS],
    children: [NodeId; INTERNAL_CHILD_SLOTS],
}

impl<K: IndexKey> InternalNode<K> {
    fn empty() -> Self {
        Self {
            len: 0,
            keys: std::array::from_fn(|_| K::default()),
            children: [NodeId::INVALID; INTERNAL_CHILD_SLOTS],
        }
    }

    /// A fresh root with a single separator.
    pub(crate) fn new_root(left: NodeId, key: K, right: NodeId) -> Self {
        let mut node = Self::empty();
        node.keys[0] = key;
        node.children[0] = left;
        node.children[1] = right;
        node.len = 1;
        node
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn keys(&self) -> &[K] {
        &self.keys[..self.len]
    }

    #[inline]
    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children[..=self.len]
    }

    #[inline]
    pub(crate) fn child(&self, idx: usize) -> NodeId {
        self.children[idx]
    }

    /// Slot of the child to descend into: the first `i` with
    /// `key <= keys[i]`, else the last child.
    #[inline]
    pub(crate) fn child_index(&self, key: &K) -> usize {
        self.keys().partition_point(|k| k < key)
    }

    /// Whether the overflow slot is in use and the node must split.
    #[inline]
    pub(crate) fn is_overfull(&self) -> bool {
        self.len > MAX_KEYS
    }

    /// Insert a promoted key at `idx` with its right sibling at `idx + 1`.
    ///
    /// `idx` is the slot of the child that split.
    pub(crate) fn insert_at(&mut self, idx: usize, key: K, right: NodeId) {
        debug_assert!(self.len <= MAX_KEYS, "insert into overfull internal node");
        debug_assert!(idx <= self.len);

        let len = self.len;
        self.keys[idx..=len].rotate_right(1);
        self.keys[idx] = key;
        self.children[idx + 1..=len + 1].rotate_right(1);
        self.children[idx + 1] = right;
        self.len += 1;
    }

    /// Split around the middle key, which is removed and returned for
    /// promotion along with the new right sibling.
    pub(crate) fn split(&mut self) -> (K, InternalNode<K>) {
        let mid = self.len / 2;
        let mut right = Self::empty();

        let promoted = mem::take(&mut self.keys[mid]);
        for (dst, src) in (mid + 1..self.len).enumerate() {
            right.keys[dst] = mem::take(&mut self.keys[src]);
        }
        for (dst, src) in (mid + 1..=self.len).enumerate() {
            right.children[dst] = mem::replace(&mut self.children[src], NodeId::INVALID);
        }
        right.len = self.len - mid - 1;
        self.len = mid;

        (promoted, right)
    }
}
