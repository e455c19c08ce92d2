//! B+ tree index.
//!
//! # Layout
//! - `node` - Fixed-capacity leaf and internal nodes
//! - `tree` - The arena-backed tree: insert, search, iteration
//! - `stats` - Shape statistics and node-visit counters
//!
//! Leaves hold up to [`MAX_KEYS`](crate::common::config::MAX_KEYS) sorted
//! `(key, location)` entries and are chained left to right, so a range scan
//! descends once and then walks the chain.

mod node;
mod stats;
mod tree;

pub use stats::{NodeVisits, TreeStats};
pub use tree::{BPlusTree, Iter};
