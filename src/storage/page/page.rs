//! Page - a 4KB arena of packed fixed-size records.
//!
//! A [`Page`] stores an integral number of [`GameRecord`]s back to back.
//! Records are only ever appended; slots are never freed or compacted, so a
//! slot id identifies the same record for the lifetime of the page.

use crate::common::config::{PAGE_SIZE, RECORDS_PER_PAGE, RECORD_SIZE};
use crate::common::{Error, PageId, Result};
use crate::storage::record::GameRecord;

use super::page_header::PageHeader;

/// A page of packed records.
///
/// # Memory Layout
/// ```text
/// ┌──────────┬──────────┬──────────┬─────┬──────────┬────────────┐
/// │ slot 0   │ slot 1   │ slot 2   │ ... │ slot n-1 │  unused    │
/// │ 44 bytes │ 44 bytes │ 44 bytes │     │ 44 bytes │            │
/// └──────────┴──────────┴──────────┴─────┴──────────┴────────────┘
/// 0                                          used_space      PAGE_SIZE
/// ```
///
/// Invariant: `used_space == record_count * RECORD_SIZE <= PAGE_SIZE`.
///
/// # Clone Implementation
/// `Page` does NOT implement `Clone` in production code (copying 4KB should
/// be explicit). A `#[cfg(test)]` Clone is provided for tests.
///
/// # Example
/// ```
/// use boxscoredb::{GameRecord, Page};
///
/// let mut page = Page::new();
/// assert!(page.add_record(&GameRecord::default()));
/// assert_eq!(page.record_count(), 1);
/// ```
pub struct Page {
    data: [u8; PAGE_SIZE],
    used_space: usize,
    record_count: usize,
}

impl Page {
    /// Create a new empty page.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
            used_space: 0,
            record_count: 0,
        }
    }

    /// Maximum number of records a page can hold.
    #[inline]
    pub const fn max_records() -> usize {
        RECORDS_PER_PAGE
    }

    /// Check whether one more record fits.
    #[inline]
    pub fn can_fit_record(&self) -> bool {
        self.used_space + RECORD_SIZE <= PAGE_SIZE
    }

    /// Append a record to the next free slot.
    ///
    /// Returns `false` (and leaves the page untouched) if the page is full.
    pub fn add_record(&mut self, record: &GameRecord) -> bool {
        if !self.can_fit_record() {
            return false;
        }

        record.write_to(&mut self.data[self.used_space..self.used_space + RECORD_SIZE]);
        self.used_space += RECORD_SIZE;
        self.record_count += 1;
        true
    }

    /// Read the record at `slot`, or `None` if the slot is unused.
    pub fn record(&self, slot: u16) -> Option<GameRecord> {
        let slot = slot as usize;
        if slot >= self.record_count {
            return None;
        }

        let start = slot * RECORD_SIZE;
        Some(GameRecord::from_bytes(&self.data[start..start + RECORD_SIZE]))
    }

    /// Iterate over `(slot_id, record)` in slot order.
    pub fn records(&self) -> impl Iterator<Item = (u16, GameRecord)> + '_ {
        self.data[..self.used_space]
            .chunks_exact(RECORD_SIZE)
            .enumerate()
            .map(|(slot, bytes)| (slot as u16, GameRecord::from_bytes(bytes)))
    }

    /// Number of records stored.
    #[inline]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Bytes of the arena in use.
    #[inline]
    pub fn used_space(&self) -> usize {
        self.used_space
    }

    /// Get immutable slice of the arena.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Header describing this page, with the checksum left at zero.
    pub fn header(&self) -> PageHeader {
        PageHeader {
            used_space: self.used_space as u32,
            record_count: self.record_count as u32,
            checksum: 0,
        }
    }

    /// Serialize the page (header + arena) into `image` and stamp the
    /// checksum.
    ///
    /// # Panics
    /// Panics if `image.len() != PageHeader::IMAGE_SIZE`.
    pub fn write_image(&self, image: &mut [u8]) {
        assert_eq!(image.len(), PageHeader::IMAGE_SIZE, "bad page image size");

        self.header().write_to(image);
        image[PageHeader::SIZE..].copy_from_slice(&self.data);

        let checksum = PageHeader::compute_checksum(image);
        image[PageHeader::OFFSET_CHECKSUM..PageHeader::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&checksum.to_le_bytes());
    }

    /// Rebuild a page from its on-disk image.
    ///
    /// # Errors
    /// - `Error::ChecksumMismatch` if the CRC32 does not match
    /// - `Error::CorruptPage` if the header breaks the packing invariant
    pub fn from_image(page_id: PageId, image: &[u8]) -> Result<Self> {
        if image.len() != PageHeader::IMAGE_SIZE {
            return Err(Error::CorruptPage {
                page_id: page_id.0,
                reason: format!("image is {} bytes", image.len()),
            });
        }

        let header = PageHeader::from_bytes(image);
        if !header.verify_checksum(image) {
            return Err(Error::ChecksumMismatch { page_id: page_id.0 });
        }

        let used_space = header.used_space as usize;
        let record_count = header.record_count as usize;
        if used_space > PAGE_SIZE || used_space != record_count * RECORD_SIZE {
            return Err(Error::CorruptPage {
                page_id: page_id.0,
                reason: format!(
                    "used_space {} does not match {} records",
                    used_space, record_count
                ),
            });
        }

        let mut page = Page::new();
        page.data.copy_from_slice(&image[PageHeader::SIZE..]);
        page.used_space = used_space;
        page.record_count = record_count;
        Ok(page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

// Clone only available in tests - forces explicit copying in production
#[cfg(test)]
impl Clone for Page {
    fn clone(&self) -> Self {
        let mut new_page = Page::new();
        new_page.data.copy_from_slice(&self.data);
        new_page.used_space = self.used_space;
        new_page.record_count = self.record_count;
        new_page
    }
}

// ============================================================================
// TESTS
// ============================================================================
