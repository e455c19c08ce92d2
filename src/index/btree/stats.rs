//! Tree shape statistics and node-visit counters.

use std::fmt;
use std::ops::AddAssign;

/// Nodes touched by one instrumented range scan.
///
/// # Example
/// ```
/// use boxscoredb::index::NodeVisits;
///
/// let mut total = NodeVisits::default();
/// total += NodeVisits { internal_nodes: 2, leaf_nodes: 3 };
/// assert_eq!(total.total(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeVisits {
    /// Internal nodes touched while descending.
    pub internal_nodes: u64,
    /// Leaves touched while sweeping the leaf chain.
    pub leaf_nodes: u64,
}

impl NodeVisits {
    pub fn total(&self) -> u64 {
        self.internal_nodes + self.leaf_nodes
    }
}

impl AddAssign for NodeVisits {
    fn add_assign(&mut self, rhs: Self) {
        self.internal_nodes += rhs.internal_nodes;
        self.leaf_nodes += rhs.leaf_nodes;
    }
}

/// Shape of a tree, computed by a full traversal.
///
/// Only used for diagnostics; no algorithm reads these.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub internal_nodes: usize,
    /// Number of levels; 0 for an empty tree, 1 for a lone leaf.
    pub height: usize,
    /// Keys held by every node, separators included.
    pub total_keys: usize,
    /// Entries held by leaves (one per indexed record).
    pub leaf_entries: usize,
    /// Children summed over internal nodes.
    pub child_links: usize,
    /// Approximate in-memory footprint of the nodes in bytes.
    pub approx_bytes: usize,
}

impl TreeStats {
    /// Mean entries per leaf.
    pub fn avg_keys_per_leaf(&self) -> f64 {
        if self.leaf_nodes == 0 {
            0.0
        } else {
            self.leaf_entries as f64 / self.leaf_nodes as f64
        }
    }

    /// Mean children per internal node.
    pub fn avg_fanout(&self) -> f64 {
        if self.internal_nodes == 0 {
            0.0
        } else {
            self.child_links as f64 / self.internal_nodes as f64
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes: {} (leaf {}, internal {}), height: {}, keys: {}, avg keys/leaf: {:.2}, avg fan-out: {:.2}",
            self.total_nodes,
            self.leaf_nodes,
            self.internal_nodes,
            self.height,
            self.total_keys,
            self.avg_keys_per_leaf(),
            self.avg_fanout()
        )
    }
}
