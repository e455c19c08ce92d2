//! The five attribute indexes over one page store.

use std::fmt;

use tracing::info;

use crate::common::Location;
use crate::deletion::TombstoneMap;
use crate::index::btree::{BPlusTree, TreeStats};
use crate::index::column::{Column, Date, FieldGoalPct, FreeThrowPct, Points, TeamId};
use crate::index::key::Percentage;
use crate::storage::{GameDate, GameRecord, PageStore};

/// One B+ tree per indexed attribute.
///
/// Trees are built from a [`PageStore`] in page/slot order and hold
/// [`Location`]s only; resolving hits back to records is the caller's job.
///
/// # Example
/// ```
/// use boxscoredb::index::IndexManager;
/// use boxscoredb::{GameRecord, PageStore};
///
/// let mut store = PageStore::new();
/// store.add_record(&GameRecord { pts_home: 120, ..GameRecord::default() });
/// store.add_record(&GameRecord { pts_home: 95, ..GameRecord::default() });
///
/// let mut indexes = IndexManager::new();
/// indexes.build(&store);
/// assert_eq!(indexes.search_by_points_range(100, 130).len(), 1);
/// ```
#[derive(Default)]
pub struct IndexManager {
    pub(crate) team_id: BPlusTree<i32>,
    pub(crate) points: BPlusTree<i32>,
    pub(crate) fg_pct: BPlusTree<Percentage>,
    pub(crate) ft_pct: BPlusTree<Percentage>,
    pub(crate) date: BPlusTree<GameDate>,
}

impl IndexManager {
    /// Create a manager with five empty trees.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Discard the current trees and index every record in the store.
    pub fn build(&mut self, store: &PageStore) {
        self.build_filtered(store, |_| true);
        info!(records = self.team_id.len(), "built indexes");
    }

    /// Like [`build`](Self::build), but leave out tombstoned locations.
    pub fn build_skipping_deleted(&mut self, store: &PageStore, tombstones: &TombstoneMap) {
        self.build_filtered(store, |loc| !tombstones.is_deleted(loc));
        info!(
            records = self.team_id.len(),
            skipped = store.total_records() - self.team_id.len(),
            "rebuilt indexes without deleted records"
        );
    }

    fn build_filtered(&mut self, store: &PageStore, mut keep: impl FnMut(Location) -> bool) {
        self.clear();
        for (location, record) in store.iter() {
            if keep(location) {
                self.insert(&record, location);
            }
        }
    }

    /// Index one record under `location` in every tree.
    pub fn insert(&mut self, record: &GameRecord, location: Location) {
        Self::insert_into::<TeamId>(self, record, location);
        Self::insert_into::<Points>(self, record, location);
        Self::insert_into::<FieldGoalPct>(self, record, location);
        Self::insert_into::<FreeThrowPct>(self, record, location);
        Self::insert_into::<Date>(self, record, location);
    }

    fn insert_into<C: Column>(&mut self, record: &GameRecord, location: Location) {
        C::tree_mut(self).insert(C::key(record), location);
    }

    /// Empty every tree.
    pub fn clear(&mut self) {
        self.team_id.clear();
        self.points.clear();
        self.fg_pct.clear();
        self.ft_pct.clear();
        self.date.clear();
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.team_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.team_id.is_empty()
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Locations whose `C` attribute equals `key`.
    pub fn search_exact<C: Column>(&self, key: &C::Key) -> Vec<Location> {
        C::tree(self).exact_search(key)
    }

    /// Locations whose `C` attribute lies in `[min, max]`.
    pub fn search_range<C: Column>(&self, min: &C::Key, max: &C::Key) -> Vec<Location> {
        C::tree(self).range_search(min, max)
    }

    pub fn search_by_team_id(&self, team_id: i32) -> Vec<Location> {
        self.search_exact::<TeamId>(&team_id)
    }

    pub fn search_by_points_range(&self, min: i32, max: i32) -> Vec<Location> {
        self.search_range::<Points>(&min, &max)
    }

    pub fn search_by_fg_pct(&self, min: f32, max: f32) -> Vec<Location> {
        self.search_range::<FieldGoalPct>(&Percentage::new(min), &Percentage::new(max))
    }

    pub fn search_by_ft_pct(&self, min: f32, max: f32) -> Vec<Location> {
        self.search_range::<FreeThrowPct>(&Percentage::new(min), &Percentage::new(max))
    }

    pub fn search_by_date(&self, date: &GameDate) -> Vec<Location> {
        self.search_exact::<Date>(date)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Shape statistics for every tree.
    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics {
            per_index: [
                (TeamId::NAME, self.team_id.stats()),
                (Points::NAME, self.points.stats()),
                (FieldGoalPct::NAME, self.fg_pct.stats()),
                (FreeThrowPct::NAME, self.ft_pct.stats()),
                (Date::NAME, self.date.stats()),
            ],
        }
    }
}

/// Per-index [`TreeStats`] plus totals across all five trees.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStatistics {
    pub per_index: [(&'static str, TreeStats); 5],
}

impl IndexStatistics {
    /// Stats for the index with the given column name.
    pub fn get(&self, name: &str) -> Option<&TreeStats> {
        self.per_index.iter().find(|(n, _)| *n == name).map(|(_, s)| s)
    }

    pub fn total_nodes(&self) -> usize {
        self.per_index.iter().map(|(_, s)| s.total_nodes).sum()
    }

    pub fn total_keys(&self) -> usize {
        self.per_index.iter().map(|(_, s)| s.total_keys).sum()
    }

    pub fn total_bytes(&self) -> usize {
        self.per_index.iter().map(|(_, s)| s.approx_bytes).sum()
    }
}

impl fmt::Display for IndexStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, stats) in &self.per_index {
            writeln!(f, "{:>8}: {}", name, stats)?;
        }
        write!(
            f,
            "   total: {} nodes, {} keys, ~{} KB",
            self.total_nodes(),
            self.total_keys(),
            self.total_bytes() / 1024
        )
    }
}
