//! Database facade - pages, indexes and tombstones behind one handle.

mod stats;

pub use stats::{QueryStats, QueryStatsSnapshot, StorageStatistics};

use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::Ordering;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::common::{Location, Result};
use crate::deletion::{self, DeletionStats, Strategy, StrategyComparison, TombstoneMap};
use crate::index::{
    Column, Date, FieldGoalPct, FreeThrowPct, IndexManager, IndexStatistics, Percentage, Points,
    TeamId, ThresholdKey,
};
use crate::storage::{loader, DatabaseFile, GameDate, GameRecord, LoadReport, PageStore};

/// A game-record database: a page store, its five indexes and the deletion
/// flags over it.
///
/// # Architecture
/// ```text
/// ┌────────────────────────────────────────────────────────────┐
/// │                         Database                           │
/// │  ┌──────────────┐   ┌──────────────┐   ┌────────────────┐  │
/// │  │    store     │   │   indexes    │   │   tombstones   │  │
/// │  │ RwLock<...>  │   │ RwLock<...>  │   │   Mutex<...>   │  │
/// │  └──────▲───────┘   └──────┬───────┘   └───────┬────────┘  │
/// │         │   locations      │    skip deleted   │           │
/// │         └──────────────────┴───────────────────┘           │
/// └────────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `store`: `RwLock` - many readers, written on load
/// - `indexes`: `RwLock` - many readers, written on build/rebuild
/// - `tombstones`: `Mutex` - flipped by deletion passes
/// - `stats`: No lock - all atomic counters
///
/// Locks are always taken in the order store, indexes, tombstones.
/// Queries take shared locks only, so readers run concurrently; loads,
/// deletions and rebuilds are serialized against each other.
///
/// # Indexes
/// Indexes are not maintained automatically after a bulk load or a read from
/// disk; call [`build_indexes`](Self::build_indexes). Records added one at a
/// time with [`add_record`](Self::add_record) are indexed immediately.
///
/// # Example
/// ```
/// use boxscoredb::{Database, GameRecord};
///
/// let db = Database::new();
/// db.add_record(&GameRecord { team_id_home: 7, ft_pct_home: 0.95, ..GameRecord::default() });
/// db.add_record(&GameRecord { team_id_home: 7, ft_pct_home: 0.60, ..GameRecord::default() });
///
/// let stats = db.delete_ft_pct_above_indexed(0.9);
/// assert_eq!(stats.records_deleted, 1);
/// assert_eq!(db.search_by_team_id(7).len(), 1);
/// ```
pub struct Database {
    store: RwLock<PageStore>,
    indexes: RwLock<IndexManager>,
    tombstones: Mutex<TombstoneMap>,
    stats: QueryStats,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(PageStore::new()),
            indexes: RwLock::new(IndexManager::new()),
            tombstones: Mutex::new(TombstoneMap::new()),
            stats: QueryStats::new(),
        }
    }

    /// Read a database file and build its indexes.
    ///
    /// # Errors
    /// Any error from [`read_from_disk`](Self::read_from_disk).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Self::new();
        db.read_from_disk(path)?;
        db.build_indexes();
        Ok(db)
    }

    // ========================================================================
    // Loading and persistence
    // ========================================================================

    /// Append every valid line of a tab-separated file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read. Malformed lines are
    /// counted in the report, not treated as errors.
    pub fn load_from_text_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        let mut store = self.store.write();
        let report = loader::load_from_path(path, &mut store)?;
        self.tombstones.lock().ensure_shape(&store);
        Ok(report)
    }

    /// Like [`load_from_text_file`](Self::load_from_text_file), from any reader.
    pub fn load_from_reader<R: BufRead>(&self, reader: R) -> Result<LoadReport> {
        let mut store = self.store.write();
        let report = loader::load_from_reader(reader, &mut store)?;
        self.tombstones.lock().ensure_shape(&store);
        Ok(report)
    }

    /// Append one record and index it.
    pub fn add_record(&self, record: &GameRecord) -> Location {
        let mut store = self.store.write();
        let location = store.add_record(record);
        self.indexes.write().insert(record, location);
        self.tombstones.lock().ensure_shape(&store);
        location
    }

    /// Write every page, deleted slots included, to `path`.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be written.
    pub fn write_to_disk<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let store = self.store.read();
        DatabaseFile::new(path).write(&store)
    }

    /// Replace the store with the contents of `path`.
    ///
    /// Every tombstone is cleared and the indexes are emptied; call
    /// [`build_indexes`](Self::build_indexes) afterwards. On error the
    /// current contents are left untouched.
    ///
    /// # Errors
    /// Any error from [`DatabaseFile::read`].
    pub fn read_from_disk<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let loaded = DatabaseFile::new(path).read()?;

        let mut store = self.store.write();
        *store = loaded;
        self.indexes.write().clear();
        self.tombstones.lock().reset(&store);
        Ok(())
    }

    // ========================================================================
    // Indexes
    // ========================================================================

    /// Rebuild all five indexes from every record, deleted ones included.
    pub fn build_indexes(&self) {
        let store = self.store.read();
        self.indexes.write().build(&store);
    }

    /// Rebuild all five indexes, leaving out deleted records.
    pub fn rebuild_indexes_skipping_deleted(&self) {
        let store = self.store.read();
        let snapshot = self.tombstones.lock().clone();

        let mut rebuilt = IndexManager::new();
        rebuilt.build_skipping_deleted(&store, &snapshot);
        *self.indexes.write() = rebuilt;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Live records whose `C` attribute equals `key`.
    pub fn find<C: Column>(&self, key: &C::Key) -> Vec<GameRecord> {
        let store = self.store.read();
        let indexes = self.indexes.read();
        let hits = indexes.search_exact::<C>(key);
        self.resolve(&store, hits)
    }

    /// Live records whose `C` attribute lies in `[min, max]`.
    pub fn find_range<C: Column>(&self, min: &C::Key, max: &C::Key) -> Vec<GameRecord> {
        let store = self.store.read();
        let indexes = self.indexes.read();
        let hits = indexes.search_range::<C>(min, max);
        self.resolve(&store, hits)
    }

    pub fn search_by_team_id(&self, team_id: i32) -> Vec<GameRecord> {
        self.find::<TeamId>(&team_id)
    }

    pub fn search_by_date(&self, date: &GameDate) -> Vec<GameRecord> {
        self.find::<Date>(date)
    }

    pub fn search_by_points_range(&self, min: i32, max: i32) -> Vec<GameRecord> {
        self.find_range::<Points>(&min, &max)
    }

    pub fn search_by_fg_pct(&self, min: f32, max: f32) -> Vec<GameRecord> {
        self.find_range::<FieldGoalPct>(&Percentage::new(min), &Percentage::new(max))
    }

    pub fn search_by_ft_pct(&self, min: f32, max: f32) -> Vec<GameRecord> {
        self.find_range::<FreeThrowPct>(&Percentage::new(min), &Percentage::new(max))
    }

    /// Turn index hits into records, dropping deleted and stale locations.
    fn resolve(&self, store: &PageStore, hits: Vec<Location>) -> Vec<GameRecord> {
        let tombstones = self.tombstones.lock();
        let mut records = Vec::with_capacity(hits.len());
        let mut skipped = 0;

        for location in &hits {
            if tombstones.is_deleted(*location) {
                skipped += 1;
                continue;
            }
            if let Ok(record) = store.record(*location) {
                records.push(record);
            }
        }

        self.stats.queries.fetch_add(1, Ordering::Relaxed);
        self.stats.index_hits.fetch_add(hits.len() as u64, Ordering::Relaxed);
        self.stats.records_returned.fetch_add(records.len() as u64, Ordering::Relaxed);
        self.stats.deleted_skipped.fetch_add(skipped, Ordering::Relaxed);
        records
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Delete every live record with `C > threshold` by full scan.
    pub fn delete_above_linear<C>(&self, threshold: C::Key) -> DeletionStats
    where
        C: Column,
        C::Key: ThresholdKey,
    {
        let store = self.store.read();
        let mut tombstones = self.tombstones.lock();
        deletion::delete_above_linear::<C>(&store, &mut tombstones, threshold)
    }

    /// Delete every live record with `C > threshold` through `C`'s index.
    pub fn delete_above_indexed<C>(&self, threshold: C::Key) -> DeletionStats
    where
        C: Column,
        C::Key: ThresholdKey,
    {
        let store = self.store.read();
        let indexes = self.indexes.read();
        let mut tombstones = self.tombstones.lock();
        deletion::delete_above_indexed::<C>(&store, &indexes, &mut tombstones, threshold)
    }

    /// Run both strategies on copies of the current tombstones. Nothing is
    /// deleted.
    pub fn compare_deletion<C>(&self, threshold: C::Key) -> StrategyComparison
    where
        C: Column,
        C::Key: ThresholdKey,
    {
        let store = self.store.read();
        let indexes = self.indexes.read();
        let tombstones = self.tombstones.lock();
        deletion::compare_strategies::<C>(&store, &indexes, &tombstones, threshold)
    }

    pub fn delete_ft_pct_above_linear(&self, threshold: f32) -> DeletionStats {
        self.delete_above_linear::<FreeThrowPct>(Percentage::new(threshold))
    }

    pub fn delete_ft_pct_above_indexed(&self, threshold: f32) -> DeletionStats {
        self.delete_above_indexed::<FreeThrowPct>(Percentage::new(threshold))
    }

    /// Delete by free-throw percentage with the chosen strategy.
    pub fn delete_ft_pct_above(&self, threshold: f32, strategy: Strategy) -> DeletionStats {
        let stats = match strategy {
            Strategy::Linear => self.delete_ft_pct_above_linear(threshold),
            Strategy::Indexed => self.delete_ft_pct_above_indexed(threshold),
        };
        info!(
            %strategy,
            threshold,
            deleted = stats.records_deleted,
            "deleted by free-throw percentage"
        );
        stats
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Number of records stored, deleted ones included.
    pub fn record_count(&self) -> usize {
        self.store.read().total_records()
    }

    /// Number of deleted records.
    pub fn deleted_count(&self) -> usize {
        self.tombstones.lock().deleted_count()
    }

    /// Whether the record at `location` is deleted.
    pub fn is_deleted(&self, location: Location) -> bool {
        self.tombstones.lock().is_deleted(location)
    }

    pub fn index_statistics(&self) -> IndexStatistics {
        self.indexes.read().statistics()
    }

    pub fn storage_statistics(&self) -> StorageStatistics {
        StorageStatistics::of(&self.store.read())
    }

    pub fn query_stats(&self) -> QueryStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
