//! Per-slot deletion flags.

use tracing::debug;

use crate::common::Location;
use crate::storage::PageStore;

/// Logical deletion flags, one per record slot.
///
/// A slot moves from live to deleted once and never back; the page bytes
/// are left untouched. The map is purely in memory and must be reshaped
/// whenever the store's page layout changes.
///
/// # Example
/// ```
/// use boxscoredb::deletion::TombstoneMap;
/// use boxscoredb::{GameRecord, PageStore};
///
/// let mut store = PageStore::new();
/// let loc = store.add_record(&GameRecord::default());
///
/// let mut tombstones = TombstoneMap::new();
/// tombstones.ensure_shape(&store);
/// assert!(tombstones.mark(loc));
/// assert!(!tombstones.mark(loc)); // already deleted
/// assert!(tombstones.is_deleted(loc));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TombstoneMap {
    /// Indexed by page id, then slot id.
    pages: Vec<Vec<bool>>,
    deleted: usize,
}

impl TombstoneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map shaped for `store` with every slot live.
    pub fn for_store(store: &PageStore) -> Self {
        let mut map = Self::new();
        map.ensure_shape(store);
        map
    }

    /// Grow the map to cover every page and slot of `store`.
    ///
    /// Existing flags are kept, so records appended after a deletion pass
    /// start out live without resurrecting deleted ones.
    pub fn ensure_shape(&mut self, store: &PageStore) {
        let pages = store.pages();
        let mut grown = false;

        if self.pages.len() < pages.len() {
            self.pages.resize_with(pages.len(), Vec::new);
            grown = true;
        }
        for (flags, page) in self.pages.iter_mut().zip(pages) {
            if flags.len() < page.record_count() {
                flags.resize(page.record_count(), false);
                grown = true;
            }
        }

        if grown {
            debug!(pages = self.pages.len(), "reshaped tombstone map");
        }
    }

    /// Clear every flag and reshape for `store`. Used when pages are reloaded.
    pub fn reset(&mut self, store: &PageStore) {
        self.pages.clear();
        self.deleted = 0;
        self.ensure_shape(store);
    }

    /// Whether the slot at `location` is deleted. Unknown slots are live.
    #[inline]
    pub fn is_deleted(&self, location: Location) -> bool {
        self.pages
            .get(location.page_id.index())
            .and_then(|flags| flags.get(location.slot_id as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Flag `location` as deleted.
    ///
    /// Returns `true` if the slot was live and is now deleted, `false` if it
    /// was already deleted or lies outside the map's shape.
    pub fn mark(&mut self, location: Location) -> bool {
        let Some(flag) = self
            .pages
            .get_mut(location.page_id.index())
            .and_then(|flags| flags.get_mut(location.slot_id as usize))
        else {
            return false;
        };

        if *flag {
            return false;
        }
        *flag = true;
        self.deleted += 1;
        true
    }

    /// Number of deleted slots.
    #[inline]
    pub fn deleted_count(&self) -> usize {
        self.deleted
    }

    /// Number of slots the map covers.
    pub fn slot_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}
