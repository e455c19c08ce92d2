//! Physical record location.

use std::fmt;

use super::PageId;

/// Position of a record: a page and a slot within that page.
///
/// This is what every index leaf stores and what the tombstone map is keyed
/// by. A slot id stays valid as long as its page is not rewritten, which
/// never happens after load since pages are append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub page_id: PageId,
    pub slot_id: u16,
}

impl Location {
    /// Filler for unused leaf slots.
    pub const INVALID: Location = Location {
        page_id: PageId::INVALID,
        slot_id: u16::MAX,
    };

    #[inline]
    pub fn new(page_id: PageId, slot_id: u16) -> Self {
        Self { page_id, slot_id }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.page_id.is_valid()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, slot {})", self.page_id, self.slot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering_is_page_then_slot() {
        let a = Location::new(PageId::new(0), 90);
        let b = Location::new(PageId::new(1), 0);
        let c = Location::new(PageId::new(1), 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_location_default_is_invalid() {
        assert!(!Location::default().is_valid());
        assert!(Location::new(PageId::new(3), 7).is_valid());
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new(PageId::new(2), 5);
        assert_eq!(format!("{}", loc), "(Page(2), slot 5)");
    }
}
