//! The B+ tree: insertion with splitting, point and range search.

use std::mem;

use tracing::trace;

use crate::common::config::{MAX_KEYS, MIN_KEYS};
use crate::common::Location;
use crate::index::key::IndexKey;

use super::node::{InternalNode, LeafNode, Node, NodeId};
use super::stats::{NodeVisits, TreeStats};

/// A B+ tree mapping keys to record [`Location`]s.
///
/// # Structure
/// ```text
///                 ┌───────────────┐
///                 │   [30 | 60]   │            internal: k keys, k+1 children
///                 └──┬─────┬────┬─┘
///          ┌─────────┘     │    └─────────┐
///   ┌──────▼─────┐  ┌──────▼─────┐  ┌─────▼──────┐
///   │ 10 20 30   │─▶│ 40 50 60   │─▶│ 70 80      │   leaves: sorted entries,
///   └────────────┘  └────────────┘  └────────────┘   chained left to right
/// ```
///
/// Nodes live in an arena owned by the tree and are addressed by [`NodeId`].
/// Every node except the root is referenced by exactly one parent; the leaf
/// `next` links are the only other references. Nodes are never freed
/// individually, since the tree never deletes entries structurally; dropping
/// or clearing the tree releases all of them.
///
/// Duplicate keys are allowed and kept as separate entries.
///
/// # Example
/// ```
/// use boxscoredb::index::BPlusTree;
/// use boxscoredb::{Location, PageId};
///
/// let mut tree = BPlusTree::new();
/// for pts in [101, 99, 120, 99] {
///     tree.insert(pts, Location::new(PageId::new(0), pts as u16));
/// }
///
/// assert_eq!(tree.exact_search(&99).len(), 2);
/// assert_eq!(tree.range_search(&100, &200).len(), 2);
/// ```
pub struct BPlusTree<K> {
    nodes: Vec<Node<K>>,
    root: Option<NodeId>,
    len: usize,
}

impl<K: IndexKey> BPlusTree<K> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert an entry, splitting nodes and growing the root as needed.
    ///
    /// Returns `false` only if the tree structure is found inconsistent, in
    /// which case nothing is inserted.
    pub fn insert(&mut self, key: K, location: Location) -> bool {
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.alloc(Node::Leaf(LeafNode::new()));
                self.root = Some(root);
                root
            }
        };

        // Descend, remembering which child slot was taken at each level.
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = root;
        while let Node::Internal(inner) = &self.nodes[current.0] {
            let idx = inner.child_index(&key);
            path.push((current, idx));
            current = inner.child(idx);
        }

        let Node::Leaf(leaf) = &mut self.nodes[current.0] else {
            return false;
        };

        if leaf.insert(key.clone(), location) {
            self.len += 1;
            return true;
        }

        // Full leaf: split first, then place the entry in its half.
        let mut right = leaf.split();
        if key < right.keys()[0] {
            leaf.insert(key, location);
        } else {
            right.insert(key, location);
        }
        let promoted = right.keys()[0].clone();

        let right_id = self.alloc(Node::Leaf(right));
        if let Node::Leaf(leaf) = &mut self.nodes[current.0] {
            leaf.next = Some(right_id);
        }
        trace!(left = current.0, right = right_id.0, ?promoted, "split leaf");

        self.len += 1;
        self.promote(path, promoted, right_id);
        true
    }

    /// Carry a promoted key and its new right node up the recorded path.
    fn promote(&mut self, mut path: Vec<(NodeId, usize)>, mut key: K, mut right: NodeId) {
        while let Some((parent_id, idx)) = path.pop() {
            let Node::Internal(parent) = &mut self.nodes[parent_id.0] else {
                return;
            };

            parent.insert_at(idx, key, right);
            if !parent.is_overfull() {
                return;
            }

            let (up, sibling) = parent.split();
            let sibling_id = self.alloc(Node::Internal(sibling));
            trace!(left = parent_id.0, right = sibling_id.0, promoted = ?up, "split internal node");

            key = up;
            right = sibling_id;
        }

        // Path exhausted: the old root split, so the tree grows a level.
        if let Some(old_root) = self.root {
            let new_root = self.alloc(Node::Internal(InternalNode::new_root(old_root, key, right)));
            self.root = Some(new_root);
            trace!(root = new_root.0, "grew new root");
        }
    }

    fn alloc(&mut self, node: Node<K>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// All locations whose key equals `key`.
    ///
    /// Starts at the leftmost leaf that can hold `key` and follows the leaf
    /// chain while equal keys continue, so duplicate runs spanning several
    /// leaves are returned in full.
    pub fn exact_search(&self, key: &K) -> Vec<Location> {
        self.range_search_instrumented(key, key).0
    }

    /// All locations with `min <= key <= max`, in key order.
    pub fn range_search(&self, min: &K, max: &K) -> Vec<Location> {
        self.range_search_instrumented(min, max).0
    }

    /// [`range_search`](Self::range_search) that also counts the internal
    /// nodes touched on the way down and the leaves touched by the sweep.
    pub fn range_search_instrumented(&self, min: &K, max: &K) -> (Vec<Location>, NodeVisits) {
        let mut visits = NodeVisits::default();
        let mut results = Vec::new();

        if min > max {
            return (results, visits);
        }
        let Some(mut leaf_id) = self.find_leaf(min, &mut visits) else {
            return (results, visits);
        };

        loop {
            let Node::Leaf(leaf) = &self.nodes[leaf_id.0] else {
                break;
            };
            visits.leaf_nodes += 1;

            let start = leaf.lower_bound(min);
            for (key, &location) in leaf.keys()[start..]
                .iter()
                .zip(&leaf.locations()[start..])
            {
                if key > max {
                    return (results, visits);
                }
                results.push(location);
            }

            match leaf.next {
                Some(next) => leaf_id = next,
                None => break,
            }
        }

        (results, visits)
    }

    /// Descend to the leftmost leaf that could contain `key`.
    fn find_leaf(&self, key: &K, visits: &mut NodeVisits) -> Option<NodeId> {
        let mut current = self.root?;
        while let Node::Internal(inner) = &self.nodes[current.0] {
            visits.internal_nodes += 1;
            current = inner.child(inner.child_index(key));
        }
        Some(current)
    }

    fn leftmost_leaf(&self) -> Option<NodeId> {
        let mut current = self.root?;
        while let Node::Internal(inner) = &self.nodes[current.0] {
            current = inner.child(0);
        }
        Some(current)
    }

    /// Iterate over every `(key, location)` in key order via the leaf chain.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            leaf: self.leftmost_leaf(),
            pos: 0,
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Shape statistics from a full traversal.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        if let Some(root) = self.root {
            self.collect_stats(root, 1, &mut stats);
        }
        stats.approx_bytes = stats.total_nodes * mem::size_of::<Node<K>>();
        stats
    }

    fn collect_stats(&self, id: NodeId, depth: usize, stats: &mut TreeStats) {
        stats.total_nodes += 1;
        match &self.nodes[id.0] {
            Node::Leaf(leaf) => {
                stats.leaf_nodes += 1;
                stats.total_keys += leaf.len();
                stats.leaf_entries += leaf.len();
                stats.height = stats.height.max(depth);
            }
            Node::Internal(inner) => {
                stats.internal_nodes += 1;
                stats.total_keys += inner.len();
                stats.child_links += inner.children().len();
                for &child in inner.children() {
                    self.collect_stats(child, depth + 1, stats);
                }
            }
        }
    }

    /// Check the structural invariants, describing the first violation.
    ///
    /// Verifies node fill, separator bounds, that every leaf sits at the same
    /// depth, that the leaf chain visits every leaf in key order, and that
    /// the entry count matches.
    pub fn validate(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(format!("empty tree reports {} entries", self.len))
            };
        };

        let mut leaves_in_order = Vec::new();
        let mut leaf_depth = None;
        self.validate_node(root, 1, None, None, &mut leaf_depth, &mut leaves_in_order)?;

        let mut chained = Vec::new();
        let mut cursor = self.leftmost_leaf();
        while let Some(id) = cursor {
            chained.push(id);
            cursor = match &self.nodes[id.0] {
                Node::Leaf(leaf) => leaf.next,
                Node::Internal(_) => return Err(format!("leaf chain reaches internal node {}", id.0)),
            };
        }
        if chained != leaves_in_order {
            return Err("leaf chain does not match in-order leaves".to_string());
        }

        let mut previous: Option<&K> = None;
        let mut count = 0;
        for (key, _) in self.iter() {
            if previous.is_some_and(|p| p > key) {
                return Err(format!("leaf chain out of order at {:?}", key));
            }
            previous = Some(key);
            count += 1;
        }
        if count != self.len {
            return Err(format!("chain holds {} entries, len is {}", count, self.len));
        }

        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        depth: usize,
        low: Option<&K>,
        high: Option<&K>,
        leaf_depth: &mut Option<usize>,
        leaves: &mut Vec<NodeId>,
    ) -> Result<(), String> {
        let in_bounds = |key: &K| low.map_or(true, |l| key >= l) && high.map_or(true, |h| key <= h);

        match &self.nodes[id.0] {
            Node::Leaf(leaf) => {
                if leaf.len() > MAX_KEYS {
                    return Err(format!("leaf {} holds {} keys", id.0, leaf.len()));
                }
                if Some(id) != self.root && leaf.len() < MIN_KEYS - 1 {
                    return Err(format!("non-root leaf {} holds {} keys", id.0, leaf.len()));
                }
                if let Some(key) = leaf.keys().iter().find(|k| !in_bounds(*k)) {
                    return Err(format!("leaf {} key {:?} outside separators", id.0, key));
                }
                match leaf_depth {
                    Some(d) if *d != depth => {
                        return Err(format!("leaf {} at depth {}, expected {}", id.0, depth, d));
                    }
                    _ => *leaf_depth = Some(depth),
                }
                leaves.push(id);
            }
            Node::Internal(inner) => {
                let min = if Some(id) == self.root { 1 } else { MIN_KEYS - 1 };
                if inner.len() < min || inner.len() > MAX_KEYS {
                    return Err(format!("internal node {} holds {} keys", id.0, inner.len()));
                }
                if inner.keys().windows(2).any(|w| w[0] > w[1]) {
                    return Err(format!("internal node {} keys unsorted", id.0));
                }
                if let Some(key) = inner.keys().iter().find(|k| !in_bounds(*k)) {
                    return Err(format!("internal node {} key {:?} outside separators", id.0, key));
                }
                let keys = inner.keys();
                for (i, &child) in inner.children().iter().enumerate() {
                    let child_low = if i == 0 { low } else { Some(&keys[i - 1]) };
                    let child_high = if i == keys.len() { high } else { Some(&keys[i]) };
                    self.validate_node(child, depth + 1, child_low, child_high, leaf_depth, leaves)?;
                }
            }
        }
        Ok(())
    }
}

impl<K: IndexKey> Default for BPlusTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a tree's entries in key order.
pub struct Iter<'a, K> {
    tree: &'a BPlusTree<K>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, K: IndexKey> Iterator for Iter<'a, K> {
    type Item = (&'a K, Location);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Node::Leaf(leaf) = &self.tree.nodes[self.leaf?.0] else {
                return None;
            };
            if self.pos < leaf.len() {
                let item = (&leaf.keys()[self.pos], leaf.locations()[self.pos]);
                self.pos += 1;
                return Some(item);
            }
            self.leaf = leaf.next;
            self.pos = 0;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
