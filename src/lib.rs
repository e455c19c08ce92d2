//! BoxscoreDB - a paged game-record store with B+ tree secondary indexes.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           BoxscoreDB                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Facade (database/)                        │   │
//! │  │     Database: locks + record resolution + counters      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Deletion Layer (deletion/)                  │   │
//! │  │   TombstoneMap + linear scan  ←─vs─→  index range scan   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Index Layer (index/)                      │   │
//! │  │   IndexManager: team id | points | FG% | FT% | date      │   │
//! │  │          each a BPlusTree<K> over record Locations       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Storage Layer (storage/)                   │   │
//! │  │  GameRecord → Page (4KB) → PageStore → DatabaseFile      │   │
//! │  │              loader: tab-separated input                 │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, Location, Error, config)
//! - [`storage`] - Records, pages and the database file
//! - [`index`] - B+ trees and the attribute indexes
//! - [`deletion`] - Tombstones and threshold deletion
//!
//! # Quick Start
//! ```no_run
//! use boxscoredb::Database;
//!
//! let db = Database::new();
//! db.load_from_text_file("games.txt").unwrap();
//! db.build_indexes();
//!
//! let lakers = db.search_by_team_id(1610612747);
//! let stats = db.delete_ft_pct_above_indexed(0.9);
//! db.rebuild_indexes_skipping_deleted();
//! db.write_to_disk("games.db").unwrap();
//! ```

pub mod common;
pub mod deletion;
pub mod index;
pub mod storage;

mod database;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, Location, PageId, Result};

pub use database::{Database, QueryStats, QueryStatsSnapshot, StorageStatistics};
pub use deletion::{DeletionStats, Strategy};
pub use index::{IndexManager, Percentage};
pub use storage::page::{Page, PageHeader};
pub use storage::{DatabaseFile, GameDate, GameRecord, LoadReport, PageStore};
