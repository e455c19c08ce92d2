//! Database file - whole-store persistence to a single file.
//!
//! The [`DatabaseFile`] writes a [`PageStore`] out as a small header followed
//! by every page image, and reads it back with full validation.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::common::config::{FILE_MAGIC, FORMAT_VERSION};
use crate::common::{Error, PageId, Result};
use crate::storage::page::{Page, PageHeader};
use crate::storage::PageStore;

/// Header at offset 0 of the database file.
///
/// # Layout (32 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       8     magic ("BXSCDB\0\0")
/// 8       4     format version (little-endian)
/// 12      4     reserved (zero)
/// 16      8     record_count (little-endian)
/// 24      8     page_count (little-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    pub record_count: u64,
    pub page_count: u64,
}

impl FileHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 32;

    fn write_to(&self, data: &mut [u8; Self::SIZE]) {
        data[0..8].copy_from_slice(&FILE_MAGIC);
        data[8..12].copy_from_slice(&self.version.to_le_bytes());
        data[12..16].fill(0);
        data[16..24].copy_from_slice(&self.record_count.to_le_bytes());
        data[24..32].copy_from_slice(&self.page_count.to_le_bytes());
    }

    fn from_bytes(data: &[u8; Self::SIZE]) -> Result<Self> {
        if data[0..8] != FILE_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let mut word = [0u8; 4];
        word.copy_from_slice(&data[8..12]);
        let version = u32::from_le_bytes(word);
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let mut dword = [0u8; 8];
        dword.copy_from_slice(&data[16..24]);
        let record_count = u64::from_le_bytes(dword);
        dword.copy_from_slice(&data[24..32]);
        let page_count = u64::from_le_bytes(dword);

        Ok(Self {
            version,
            record_count,
            page_count,
        })
    }
}

/// Reads and writes the database file.
///
/// # File Layout
/// ```text
/// ┌────────────┬──────────────┬──────────────┬─────┬──────────────┐
/// │ FileHeader │ Page image 0 │ Page image 1 │ ... │ Page image N │
/// │ (32 B)     │ (12 + 4096)  │ (12 + 4096)  │     │ (12 + 4096)  │
/// └────────────┴──────────────┴──────────────┴─────┴──────────────┘
/// ```
///
/// Each page image is a [`PageHeader`] (used space, record count, CRC32)
/// followed by the full 4KB arena, not just the packed records.
///
/// # Durability
/// [`write`](Self::write) replaces the whole file and calls `fsync()` once at
/// the end. There is no journaling; a crash mid-write leaves a file that
/// fails validation on the next read.
#[derive(Debug, Clone)]
pub struct DatabaseFile {
    path: PathBuf,
}

impl DatabaseFile {
    /// Refer to a database file at `path` (nothing is opened yet).
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size in bytes of a file holding `page_count` pages.
    pub const fn file_size(page_count: usize) -> u64 {
        (FileHeader::SIZE + page_count * PageHeader::IMAGE_SIZE) as u64
    }

    /// Write the whole store, replacing any existing file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be created or written.
    pub fn write(&self, store: &PageStore) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        let header = FileHeader {
            version: FORMAT_VERSION,
            record_count: store.total_records() as u64,
            page_count: store.page_count() as u64,
        };
        let mut header_bytes = [0u8; FileHeader::SIZE];
        header.write_to(&mut header_bytes);
        writer.write_all(&header_bytes)?;

        let mut image = vec![0u8; PageHeader::IMAGE_SIZE];
        for page in store.pages() {
            page.write_image(&mut image);
            writer.write_all(&image)?;
        }

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?; // fsync for durability

        info!(
            path = %self.path.display(),
            records = header.record_count,
            pages = header.page_count,
            "database written to disk"
        );
        Ok(())
    }

    /// Read the whole store back.
    ///
    /// # Errors
    /// - `Error::Io` if the file cannot be opened or read
    /// - `Error::InvalidMagic` / `Error::UnsupportedVersion` for foreign files
    /// - `Error::Truncated` if fewer page images follow than announced
    /// - `Error::ChecksumMismatch` / `Error::CorruptPage` for damaged pages
    /// - `Error::RecordCountMismatch` if the header disagrees with the pages
    pub fn read(&self) -> Result<PageStore> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        let mut header_bytes = [0u8; FileHeader::SIZE];
        match reader.read_exact(&mut header_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(Error::InvalidMagic),
            Err(e) => return Err(e.into()),
        }
        let header = FileHeader::from_bytes(&header_bytes)?;

        let mut pages = Vec::new();
        let mut image = vec![0u8; PageHeader::IMAGE_SIZE];
        for page_idx in 0..header.page_count {
            match reader.read_exact(&mut image) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(Error::Truncated {
                        expected: header.page_count,
                        found: page_idx,
                    });
                }
                Err(e) => return Err(e.into()),
            }
            pages.push(Page::from_image(PageId::new(page_idx as u32), &image)?);
        }

        let store = PageStore::from_pages(pages);
        if store.total_records() as u64 != header.record_count {
            return Err(Error::RecordCountMismatch {
                header: header.record_count,
                actual: store.total_records() as u64,
            });
        }

        info!(
            path = %self.path.display(),
            records = header.record_count,
            pages = header.page_count,
            "database read from disk"
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GameRecord;
    use tempfile::tempdir;

    fn store_with(n: i32) -> PageStore {
        let mut store = PageStore::new();
        for i in 0..n {
            store.add_record(&GameRecord {
                pts_home: i,
                ft_pct_home: 0.5,
                ..GameRecord::default()
            });
        }
        store
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("games.db"));

        let store = store_with(250);
        file.write(&store).unwrap();
        assert!(file.exists());

        let restored = file.read().unwrap();
        assert_eq!(restored.total_records(), 250);
        assert_eq!(restored.page_count(), store.page_count());

        let original: Vec<_> = store.iter().collect();
        let reloaded: Vec<_> = restored.iter().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_file_size_matches_layout() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("games.db"));
        let store = store_with(100);
        file.write(&store).unwrap();

        let on_disk = std::fs::metadata(file.path()).unwrap().len();
        assert_eq!(on_disk, DatabaseFile::file_size(store.page_count()));
    }

    #[test]
    fn test_empty_store_roundtrip() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("empty.db"));
        file.write(&PageStore::new()).unwrap();

        let restored = file.read().unwrap();
        assert_eq!(restored.page_count(), 0);
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("missing.db"));
        assert!(matches!(file.read(), Err(Error::Io(_))));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.db");
        std::fs::write(&path, [0x42u8; 64]).unwrap();

        assert!(matches!(DatabaseFile::new(&path).read(), Err(Error::InvalidMagic)));
    }

    #[test]
    fn test_short_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.db");
        std::fs::write(&path, b"BXSC").unwrap();

        assert!(matches!(DatabaseFile::new(&path).read(), Err(Error::InvalidMagic)));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("v.db"));
        file.write(&store_with(3)).unwrap();

        let mut bytes = std::fs::read(file.path()).unwrap();
        bytes[8..12].copy_from_slice(&9u32.to_le_bytes());
        std::fs::write(file.path(), &bytes).unwrap();

        assert!(matches!(
            file.read(),
            Err(Error::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("t.db"));
        file.write(&store_with(200)).unwrap();

        let bytes = std::fs::read(file.path()).unwrap();
        std::fs::write(file.path(), &bytes[..bytes.len() - 100]).unwrap();

        match file.read() {
            Err(Error::Truncated { expected, found }) => {
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected truncation, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_corrupted_page_rejected() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("c.db"));
        file.write(&store_with(10)).unwrap();

        let mut bytes = std::fs::read(file.path()).unwrap();
        let offset = FileHeader::SIZE + PageHeader::SIZE + 17;
        bytes[offset] ^= 0x01;
        std::fs::write(file.path(), &bytes).unwrap();

        assert!(matches!(
            file.read(),
            Err(Error::ChecksumMismatch { page_id: 0 })
        ));
    }

    #[test]
    fn test_record_count_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let file = DatabaseFile::new(dir.path().join("m.db"));
        file.write(&store_with(10)).unwrap();

        let mut bytes = std::fs::read(file.path()).unwrap();
        bytes[16..24].copy_from_slice(&11u64.to_le_bytes());
        std::fs::write(file.path(), &bytes).unwrap();

        assert!(matches!(
            file.read(),
            Err(Error::RecordCountMismatch {
                header: 11,
                actual: 10
            })
        ));
    }
}
