//! Logical deletion.
//!
//! Deleting a record only flags its slot in a [`TombstoneMap`]; page bytes
//! are never rewritten. Two strategies find the records to delete:
//! - [`delete_above_linear`] - Scan every slot of every page
//! - [`delete_above_indexed`] - Range-scan the attribute's B+ tree
//!
//! Trees keep returning tombstoned locations until they are rebuilt with
//! [`IndexManager::build_skipping_deleted`](crate::index::IndexManager::build_skipping_deleted).

mod engine;
mod stats;
mod tombstone;

pub use engine::{
    compare_strategies, delete_above_indexed, delete_above_linear, delete_ft_pct_above_indexed,
    delete_ft_pct_above_linear,
};
pub use stats::{DeletionStats, Strategy, StrategyComparison};
pub use tombstone::TombstoneMap;
