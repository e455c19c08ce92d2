//! Query counters and storage statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::config::{PAGE_SIZE, RECORDS_PER_PAGE, RECORD_SIZE};
use crate::storage::{DatabaseFile, PageStore};

/// Counters updated by every query through the [`Database`](super::Database).
///
/// All fields are atomic, so concurrent readers holding only shared locks
/// can bump them. `Ordering::Relaxed` is enough: each counter stands alone
/// and nothing synchronizes through them.
///
/// # Example
/// ```
/// use boxscoredb::QueryStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = QueryStats::new();
/// stats.queries.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().queries, 1);
/// ```
#[derive(Debug, Default)]
pub struct QueryStats {
    /// Point and range queries served.
    pub queries: AtomicU64,

    /// Locations returned by the indexes.
    pub index_hits: AtomicU64,

    /// Records resolved and returned to callers.
    pub records_returned: AtomicU64,

    /// Index hits dropped because their slot is tombstoned.
    pub deleted_skipped: AtomicU64,
}

impl QueryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of index hits that resolved to live records (0.0 to 1.0).
    pub fn live_ratio(&self) -> f64 {
        self.snapshot().live_ratio()
    }

    /// Non-atomic copy for display.
    pub fn snapshot(&self) -> QueryStatsSnapshot {
        QueryStatsSnapshot {
            queries: self.queries.load(Ordering::Relaxed),
            index_hits: self.index_hits.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            deleted_skipped: self.deleted_skipped.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.queries.store(0, Ordering::Relaxed);
        self.index_hits.store(0, Ordering::Relaxed);
        self.records_returned.store(0, Ordering::Relaxed);
        self.deleted_skipped.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time copy of [`QueryStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStatsSnapshot {
    pub queries: u64,
    pub index_hits: u64,
    pub records_returned: u64,
    pub deleted_skipped: u64,
}

impl QueryStatsSnapshot {
    pub fn live_ratio(&self) -> f64 {
        if self.index_hits == 0 {
            0.0
        } else {
            self.records_returned as f64 / self.index_hits as f64
        }
    }
}

impl fmt::Display for QueryStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queries {{ queries: {}, hits: {}, returned: {}, deleted skipped: {}, live: {:.2}% }}",
            self.queries,
            self.index_hits,
            self.records_returned,
            self.deleted_skipped,
            self.live_ratio() * 100.0
        )
    }
}

/// Size figures for the page store and its file image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStatistics {
    pub record_size: usize,
    pub record_count: usize,
    pub records_per_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Bytes the store occupies once written with [`DatabaseFile`].
    pub file_size: u64,
}

impl StorageStatistics {
    pub fn of(store: &PageStore) -> Self {
        Self {
            record_size: RECORD_SIZE,
            record_count: store.total_records(),
            records_per_page: RECORDS_PER_PAGE,
            page_count: store.page_count(),
            page_size: PAGE_SIZE,
            file_size: DatabaseFile::file_size(store.page_count()),
        }
    }
}

impl fmt::Display for StorageStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "record size:      {} bytes", self.record_size)?;
        writeln!(f, "records:          {}", self.record_count)?;
        writeln!(f, "records per page: {}", self.records_per_page)?;
        writeln!(f, "pages:            {}", self.page_count)?;
        writeln!(f, "page size:        {} bytes", self.page_size)?;
        write!(f, "file size:        {} bytes", self.file_size)
    }
}
