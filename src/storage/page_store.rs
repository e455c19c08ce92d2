//! Page store - the ordered, in-memory set of record pages.

use crate::common::{Error, Location, PageId, Result};
use crate::storage::page::Page;
use crate::storage::record::GameRecord;

/// Ordered collection of pages holding every record.
///
/// Records are appended to the last page until it is full, at which point a
/// new page is allocated; running out of room in a page is never an error.
/// Pages are enumerated in id order and slots in slot order, which is the
/// "physical order" every scan and index build relies on.
///
/// # Example
/// ```
/// use boxscoredb::{GameRecord, PageStore};
///
/// let mut store = PageStore::new();
/// let loc = store.add_record(&GameRecord::default());
/// assert_eq!(store.record(loc).unwrap(), GameRecord::default());
/// ```
#[derive(Default)]
pub struct PageStore {
    pages: Vec<Page>,
    total_records: usize,
}

impl PageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from pages read off disk.
    pub(crate) fn from_pages(pages: Vec<Page>) -> Self {
        let total_records = pages.iter().map(Page::record_count).sum();
        Self {
            pages,
            total_records,
        }
    }

    /// Append a record, allocating a new page if the last one is full.
    ///
    /// Returns the location the record was written to.
    pub fn add_record(&mut self, record: &GameRecord) -> Location {
        let needs_page = self.pages.last().map_or(true, |p| !p.can_fit_record());
        if needs_page {
            self.pages.push(Page::new());
        }

        let page_idx = self.pages.len() - 1;
        let page = &mut self.pages[page_idx];
        let slot_id = page.record_count() as u16;
        let added = page.add_record(record);
        debug_assert!(added, "fresh or non-full page rejected a record");

        self.total_records += 1;
        Location::new(PageId::new(page_idx as u32), slot_id)
    }

    /// Get a page by id.
    pub fn page(&self, page_id: PageId) -> Option<&Page> {
        self.pages.get(page_id.index())
    }

    /// All pages in id order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Resolve a location to its record.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page does not exist
    /// - `Error::SlotOutOfRange` if the slot is past the page's record count
    pub fn record(&self, location: Location) -> Result<GameRecord> {
        let page = self
            .page(location.page_id)
            .ok_or(Error::PageNotFound(location.page_id.0))?;

        page.record(location.slot_id).ok_or(Error::SlotOutOfRange {
            page_id: location.page_id.0,
            slot_id: location.slot_id,
        })
    }

    /// Enumerate every `(location, record)` in page/slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Location, GameRecord)> + '_ {
        self.pages.iter().enumerate().flat_map(|(page_idx, page)| {
            let page_id = PageId::new(page_idx as u32);
            page.records()
                .map(move |(slot_id, record)| (Location::new(page_id, slot_id), record))
        })
    }

    /// Total number of records across all pages.
    #[inline]
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Number of pages.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Drop every page.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.total_records = 0;
    }
}
