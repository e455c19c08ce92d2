//! Page identifier type.

use std::fmt;

/// Identifies a page in the [`PageStore`](crate::storage::PageStore).
///
/// Page ids are dense: page `N` is the `N`th page appended to the store and
/// the `N`th page image in the database file.
///
/// # Example
/// ```
/// use boxscoredb::{GameRecord, PageStore};
///
/// let mut store = PageStore::new();
/// let first = store.add_record(&GameRecord::default());
/// assert_eq!(first.page_id.index(), 0);
/// assert!(store.page(first.page_id).is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Sentinel for "no page", used to fill unused location slots.
    pub const INVALID: PageId = PageId(u32::MAX);

    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Check if this page ID is valid (not the sentinel value).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// The page id as a vector index.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "Page(INVALID)")
        } else {
            write!(f, "Page({})", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::RECORDS_PER_PAGE;
    use crate::storage::{GameRecord, PageStore};

    #[test]
    fn test_page_ids_are_dense_store_positions() {
        let mut store = PageStore::new();
        let locations: Vec<_> = (0..2 * RECORDS_PER_PAGE + 1)
            .map(|_| store.add_record(&GameRecord::default()))
            .collect();

        assert_eq!(store.page_count(), 3);
        for (n, loc) in locations.iter().enumerate() {
            assert_eq!(loc.page_id.index(), n / RECORDS_PER_PAGE);
            assert!(loc.page_id.is_valid());
        }
        assert!(store.page(PageId::new(3)).is_none());
    }

    #[test]
    fn test_invalid_never_names_a_page() {
        let mut store = PageStore::new();
        store.add_record(&GameRecord::default());
        assert!(store.page(PageId::INVALID).is_none());
        assert_eq!(PageId::INVALID.to_string(), "Page(INVALID)");
        assert_eq!(PageId::new(7).to_string(), "Page(7)");
    }
}
