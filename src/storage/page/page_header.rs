//! Page header stored in front of every on-disk page image.
//!
//! The header records how much of the arena is in use and carries a CRC32
//! checksum of the whole image.

use crate::common::config::PAGE_SIZE;

/// Metadata written before a page's arena in the database file.
///
/// # Layout (12 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     used_space (bytes of the arena in use, little-endian)
/// 4       4     record_count (little-endian)
/// 8       4     checksum (CRC32, little-endian)
/// ```
///
/// # Checksum
/// The checksum is computed over the entire image (header + arena) with the
/// checksum field itself set to zero, so verification needs no special
/// handling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Bytes of the arena consumed by records.
    pub used_space: u32,
    /// Number of records packed into the arena.
    pub record_count: u32,
    /// CRC32 checksum of the page image.
    pub checksum: u32,
}

impl PageHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 12;

    /// Offset of each field within the header.
    pub const OFFSET_USED_SPACE: usize = 0;
    pub const OFFSET_RECORD_COUNT: usize = 4;
    pub const OFFSET_CHECKSUM: usize = 8;

    /// Size of a full page image (header followed by the arena).
    pub const IMAGE_SIZE: usize = Self::SIZE + PAGE_SIZE;

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < PageHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for PageHeader");

        Self {
            used_space: read_u32(data, Self::OFFSET_USED_SPACE),
            record_count: read_u32(data, Self::OFFSET_RECORD_COUNT),
            checksum: read_u32(data, Self::OFFSET_CHECKSUM),
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < PageHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for PageHeader");

        data[Self::OFFSET_USED_SPACE..Self::OFFSET_USED_SPACE + 4]
            .copy_from_slice(&self.used_space.to_le_bytes());
        data[Self::OFFSET_RECORD_COUNT..Self::OFFSET_RECORD_COUNT + 4]
            .copy_from_slice(&self.record_count.to_le_bytes());
        data[Self::OFFSET_CHECKSUM..Self::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&self.checksum.to_le_bytes());
    }

    /// Compute the CRC32 checksum of a page image.
    ///
    /// The checksum field (bytes 8-11) is fed as zeros so the checksum
    /// doesn't include itself.
    pub fn compute_checksum(image: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();

        hasher.update(&image[..Self::OFFSET_CHECKSUM]);
        hasher.update(&[0u8; 4]);
        hasher.update(&image[Self::OFFSET_CHECKSUM + 4..]);

        hasher.finalize()
    }

    /// Verify that the stored checksum matches the image contents.
    pub fn verify_checksum(&self, image: &[u8]) -> bool {
        self.checksum == Self::compute_checksum(image)
    }
}

#[inline]
fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

// ============================================================================
// TESTS
// ============================================================================
