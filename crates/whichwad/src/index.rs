//! Memoizing archive index cache.
//!
//! Each archive is parsed at most once per run. A parse failure poisons the
//! slot: the failing archive is excluded from all further matching and the
//! failure is surfaced exactly once, on the access that hit it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use whichwad_wad::WadArchive;

/// Why an index lookup produced no directory.
#[derive(Debug, Error)]
pub enum IndexError {
    /// First access to the archive and it failed to parse. The caller is
    /// expected to report this; subsequent accesses return [`Poisoned`].
    ///
    /// [`Poisoned`]: IndexError::Poisoned
    #[error("failed to read WAD: {0}")]
    Parse(#[from] whichwad_wad::Error),

    /// The archive already failed to parse earlier in the run.
    #[error("archive already failed to parse this run")]
    Poisoned,
}

enum Slot {
    Ready(WadArchive),
    Poisoned,
}

/// Process-scoped cache of parsed archives, keyed by path.
///
/// No eviction and no invalidation: archives are treated as immutable for
/// the duration of a run.
#[derive(Default)]
pub struct IndexCache {
    slots: HashMap<PathBuf, Slot>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the parsed archive for `path`, parsing it on first access.
    pub fn get(&mut self, path: &Path) -> std::result::Result<&WadArchive, IndexError> {
        let slot = match self.slots.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => match WadArchive::open(path) {
                Ok(archive) => entry.insert(Slot::Ready(archive)),
                Err(err) => {
                    entry.insert(Slot::Poisoned);
                    return Err(IndexError::Parse(err));
                }
            },
        };

        match slot {
            Slot::Ready(archive) => Ok(archive),
            Slot::Poisoned => Err(IndexError::Poisoned),
        }
    }

    /// Check whether an archive's directory holds a texture name.
    ///
    /// Unreadable archives hold nothing.
    pub fn has(&mut self, path: &Path, name: &str) -> bool {
        self.get(path).map(|a| a.contains(name)).unwrap_or(false)
    }

    /// Number of archives parsed (or poisoned) so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::fs;

    /// Minimal valid WAD3 with an empty lump directory.
    fn empty_wad() -> Vec<u8> {
        let mut wad = Vec::new();
        wad.extend_from_slice(b"WAD3");
        wad.write_u32::<LittleEndian>(0).unwrap();
        wad.write_u32::<LittleEndian>(12).unwrap();
        wad
    }

    #[test]
    fn test_parse_once_then_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wad");
        fs::write(&path, empty_wad()).unwrap();

        let mut cache = IndexCache::new();
        assert!(cache.get(&path).is_ok());
        assert_eq!(cache.len(), 1);

        // Replacing the file on disk is not observed: the cache never
        // re-parses within a run.
        fs::write(&path, b"garbage").unwrap();
        assert!(cache.get(&path).is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failure_reported_once_then_poisoned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wad");
        fs::write(&path, b"not a wad at all").unwrap();

        let mut cache = IndexCache::new();
        assert!(matches!(cache.get(&path), Err(IndexError::Parse(_))));
        assert!(matches!(cache.get(&path), Err(IndexError::Poisoned)));
        assert!(matches!(cache.get(&path), Err(IndexError::Poisoned)));
    }

    #[test]
    fn test_has_on_unreadable_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wad");
        fs::write(&path, b"nope").unwrap();

        let mut cache = IndexCache::new();
        assert!(!cache.has(&path, "SKY1"));
    }
}
