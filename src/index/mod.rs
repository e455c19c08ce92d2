//! Secondary indexes.
//!
//! - [`btree`] - The generic B+ tree
//! - [`IndexKey`] / [`ThresholdKey`] - Key bounds, plus [`Percentage`]
//! - [`Column`] - Attribute descriptors ([`TeamId`], [`Points`], ...)
//! - [`IndexManager`] - The five attribute trees over one store

pub mod btree;
mod column;
mod key;
mod manager;

pub use btree::{BPlusTree, NodeVisits, TreeStats};
pub use column::{Column, Date, FieldGoalPct, FreeThrowPct, Points, TeamId};
pub use key::{IndexKey, Percentage, ThresholdKey};
pub use manager::{IndexManager, IndexStatistics};
