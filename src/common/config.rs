//! Configuration constants for boxscore-db.

/// Size of a page's record arena in bytes (4KB).
///
/// This is the unit records are packed into. The on-disk page image is
/// slightly larger because it carries a [`PageHeader`] in front of the arena.
///
/// [`PageHeader`]: crate::storage::page::PageHeader
pub const PAGE_SIZE: usize = 4096;

/// Size of one serialized [`GameRecord`] in bytes.
///
/// # Layout
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       11    game_date (10 ASCII chars + NUL)
/// 11      1     padding
/// 12      4     team_id_home (i32)
/// 16      4     pts_home (i32)
/// 20      4     fg_pct_home (f32)
/// 24      4     ft_pct_home (f32)
/// 28      4     fg3_pct_home (f32)
/// 32      4     ast_home (i32)
/// 36      4     reb_home (i32)
/// 40      4     home_team_wins (i32, 0 or 1)
/// ```
///
/// [`GameRecord`]: crate::storage::GameRecord
pub const RECORD_SIZE: usize = 44;

/// Number of whole records that fit in one page (93 with the sizes above).
pub const RECORDS_PER_PAGE: usize = PAGE_SIZE / RECORD_SIZE;

/// Maximum number of keys held by a B+ tree node once an insert completes.
pub const MAX_KEYS: usize = 20;

/// Minimum fill a node is left with right after a split.
pub const MIN_KEYS: usize = MAX_KEYS / 2;

/// Magic bytes at the start of every database file.
pub const FILE_MAGIC: [u8; 8] = *b"BXSCDB\0\0";

/// On-disk format version written by this build.
///
/// Readers reject any other version; there is no migration path.
pub const FORMAT_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert_eq!(PAGE_SIZE, 4096);
    }

    #[test]
    fn test_records_per_page() {
        assert_eq!(RECORDS_PER_PAGE, 93);
        assert!(RECORDS_PER_PAGE * RECORD_SIZE <= PAGE_SIZE);
    }

    #[test]
    fn test_node_fill_bounds() {
        assert_eq!(MIN_KEYS, 10);
        assert!(MIN_KEYS * 2 <= MAX_KEYS);
    }
}
