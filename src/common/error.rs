//! Error types for boxscore-db.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by boxscore-db.
///
/// Only file I/O and file-format problems are errors. Index and deletion
/// operations treat empty trees, empty ranges and zero matches as ordinary
/// empty results, and malformed input lines are skipped and counted by the
/// loader.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the database magic bytes.
    #[error("Not a boxscore database file (bad magic)")]
    InvalidMagic,

    /// The file was written with a format version this build cannot read.
    #[error("Unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The file ended before all pages announced by the header were read.
    #[error("Database file truncated: expected {expected} pages, found {found}")]
    Truncated { expected: u64, found: u64 },

    /// A page image failed CRC32 verification.
    #[error("Checksum mismatch on page {page_id}")]
    ChecksumMismatch { page_id: u32 },

    /// A page header is internally inconsistent.
    #[error("Corrupt page {page_id}: {reason}")]
    CorruptPage { page_id: u32, reason: String },

    /// The header's record count disagrees with the sum of page record counts.
    #[error("Record count mismatch: header says {header}, pages hold {actual}")]
    RecordCountMismatch { header: u64, actual: u64 },

    /// Requested page does not exist in the store.
    #[error("Page {0} not found")]
    PageNotFound(u32),

    /// Requested slot is past the page's record count.
    #[error("Slot {slot_id} out of range on page {page_id}")]
    SlotOutOfRange { page_id: u32, slot_id: u16 },

    /// A date string is not in `YYYY-MM-DD` form.
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotFound(42);
        assert_eq!(format!("{}", err), "Page 42 not found");

        let err = Error::UnsupportedVersion {
            found: 7,
            expected: 1,
        };
        assert_eq!(
            format!("{}", err),
            "Unsupported format version 7 (expected 1)"
        );

        let err = Error::SlotOutOfRange {
            page_id: 3,
            slot_id: 95,
        };
        assert_eq!(format!("{}", err), "Slot 95 out of range on page 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
        assert!(Error::InvalidMagic.source().is_none());
    }
}
