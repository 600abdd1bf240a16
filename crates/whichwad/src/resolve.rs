//! Pattern resolution against indexed archives.

use std::collections::BTreeMap;
use std::path::PathBuf;

use glob::{MatchOptions, Pattern};

use crate::index::{IndexCache, IndexError};
use crate::locate::WadFile;
use crate::{Error, Result};

/// Matching is case-insensitive: archive directories are canonical
/// uppercase, user patterns arrive in whatever casing they were typed.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Matches for one search pattern: texture name to the archives holding it,
/// as indices into the discovery-ordered archive slice.
///
/// A name only appears as a key if at least one archive holds it, and its
/// index list preserves archive discovery order, which later fixes the
/// disambiguation prompt order. Keys themselves iterate in sorted name
/// order, not in the order matches were encountered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    entries: BTreeMap<String, Vec<usize>>,
}

impl MatchGroup {
    /// Number of distinct texture names matched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate matched names with their owning archive indices.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Archive indices holding `name`, if it matched.
    pub fn owners(&self, name: &str) -> Option<&[usize]> {
        self.entries.get(&name.to_ascii_uppercase()).map(Vec::as_slice)
    }
}

/// Outcome of resolving one pattern.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Matches grouped by texture name.
    pub matches: MatchGroup,
    /// Archives that failed to parse while resolving this pattern. Each
    /// archive appears here at most once per run; later patterns skip
    /// poisoned archives silently.
    pub unreadable: Vec<(PathBuf, whichwad_wad::Error)>,
}

/// Split a raw `;`-delimited request into individual patterns.
///
/// Empty segments (doubled or trailing delimiters) are dropped.
pub fn split_patterns(raw: &str) -> Vec<&str> {
    raw.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Resolve one shell-glob pattern against every archive's texture directory.
///
/// Archives are visited in discovery order; each visit appends the
/// archive's index to the list of every texture name the pattern matched.
/// A pattern matching nothing yields an empty [`MatchGroup`]; the caller
/// decides how to report that.
pub fn resolve(
    archives: &[WadFile],
    pattern: &str,
    cache: &mut IndexCache,
) -> Result<Resolution> {
    let pattern = Pattern::new(pattern).map_err(Error::BadPattern)?;
    let mut resolution = Resolution::default();

    for (idx, wad) in archives.iter().enumerate() {
        let archive = match cache.get(&wad.path) {
            Ok(archive) => archive,
            Err(IndexError::Parse(err)) => {
                resolution.unreadable.push((wad.path.clone(), err));
                continue;
            }
            Err(IndexError::Poisoned) => continue,
        };

        for name in archive.texture_names() {
            if pattern.matches_with(name, MATCH_OPTIONS) {
                resolution
                    .matches
                    .entries
                    .entry(name.to_string())
                    .or_default()
                    .push(idx);
            }
        }
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::fs;
    use std::path::Path;

    fn padded_name(name: &str) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..name.len()].copy_from_slice(name.as_bytes());
        out
    }

    /// 16x16 miptex lump with a flat 256-entry palette.
    fn miptex_lump(name: &str) -> Vec<u8> {
        let mut lump = Vec::new();
        lump.extend_from_slice(&padded_name(name));
        lump.write_u32::<LittleEndian>(16).unwrap();
        lump.write_u32::<LittleEndian>(16).unwrap();
        let mut offset = 40u32;
        for i in 0..4 {
            lump.write_u32::<LittleEndian>(offset).unwrap();
            offset += (16 >> i) * (16 >> i);
        }
        for i in 0..4 {
            lump.extend(std::iter::repeat(0u8).take((16 >> i) * (16 >> i)));
        }
        lump.write_u16::<LittleEndian>(256).unwrap();
        lump.extend(std::iter::repeat(0u8).take(256 * 3));
        lump.extend_from_slice(&[0, 0]);
        lump
    }

    /// Write a WAD holding the named 16x16 textures.
    fn write_wad(path: &Path, names: &[&str]) {
        let lumps: Vec<Vec<u8>> = names.iter().map(|n| miptex_lump(n)).collect();

        let mut body = Vec::new();
        let mut offsets = Vec::new();
        for lump in &lumps {
            offsets.push(12 + body.len());
            body.extend_from_slice(lump);
        }

        let mut wad = Vec::new();
        wad.extend_from_slice(b"WAD3");
        wad.write_u32::<LittleEndian>(names.len() as u32).unwrap();
        wad.write_u32::<LittleEndian>(12 + body.len() as u32).unwrap();
        wad.extend_from_slice(&body);
        for (i, name) in names.iter().enumerate() {
            wad.write_u32::<LittleEndian>(offsets[i] as u32).unwrap();
            wad.write_u32::<LittleEndian>(lumps[i].len() as u32).unwrap();
            wad.write_u32::<LittleEndian>(lumps[i].len() as u32).unwrap();
            wad.push(0x43);
            wad.push(0);
            wad.write_u16::<LittleEndian>(0).unwrap();
            wad.extend_from_slice(&padded_name(name));
        }

        fs::write(path, wad).unwrap();
    }

    fn wad_file(path: &Path) -> WadFile {
        WadFile {
            path: path.to_path_buf(),
            stem: path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        }
    }

    #[test]
    fn test_split_patterns() {
        assert_eq!(split_patterns("SKY1"), vec!["SKY1"]);
        assert_eq!(split_patterns("SKY1;CRATE*"), vec!["SKY1", "CRATE*"]);
        assert_eq!(split_patterns("SKY1;;CRATE*;"), vec!["SKY1", "CRATE*"]);
        assert!(split_patterns(";").is_empty());
    }

    #[test]
    fn test_grouping_preserves_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let hd = dir.path().join("hd.wad");
        let base = dir.path().join("base.wad");
        write_wad(&hd, &["sky1"]);
        write_wad(&base, &["sky1", "sky2"]);
        let archives = vec![wad_file(&hd), wad_file(&base)];

        let mut cache = IndexCache::new();
        let resolution = resolve(&archives, "SKY*", &mut cache).unwrap();

        assert!(resolution.unreadable.is_empty());
        assert_eq!(resolution.matches.len(), 2);
        assert_eq!(resolution.matches.owners("SKY1"), Some(&[0usize, 1][..]));
        assert_eq!(resolution.matches.owners("SKY2"), Some(&[1usize][..]));
        assert_eq!(resolution.matches.owners("SKY3"), None);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let wad = dir.path().join("a.wad");
        write_wad(&wad, &["crate01"]);
        let archives = vec![wad_file(&wad)];

        let mut cache = IndexCache::new();
        let resolution = resolve(&archives, "crate?1", &mut cache).unwrap();
        assert_eq!(resolution.matches.owners("CRATE01"), Some(&[0usize][..]));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let wad = dir.path().join("a.wad");
        write_wad(&wad, &["sky1"]);
        let archives = vec![wad_file(&wad)];

        let mut cache = IndexCache::new();
        let resolution = resolve(&archives, "NONEXIST*", &mut cache).unwrap();
        assert!(resolution.matches.is_empty());

        // Other patterns in the same run still resolve independently.
        let resolution = resolve(&archives, "SKY1", &mut cache).unwrap();
        assert_eq!(resolution.matches.len(), 1);
    }

    #[test]
    fn test_unreadable_archive_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.wad");
        let broken = dir.path().join("broken.wad");
        write_wad(&good, &["sky1"]);
        fs::write(&broken, b"not a wad").unwrap();
        let archives = vec![wad_file(&broken), wad_file(&good)];

        let mut cache = IndexCache::new();
        let first = resolve(&archives, "SKY1", &mut cache).unwrap();
        assert_eq!(first.unreadable.len(), 1);
        assert_eq!(first.unreadable[0].0, broken);
        // The good archive still matched.
        assert_eq!(first.matches.owners("SKY1"), Some(&[1usize][..]));

        // Second pattern: poisoned archive skipped silently.
        let second = resolve(&archives, "SKY*", &mut cache).unwrap();
        assert!(second.unreadable.is_empty());
        assert_eq!(second.matches.owners("SKY1"), Some(&[1usize][..]));
    }

    #[test]
    fn test_bad_pattern() {
        let archives: Vec<WadFile> = Vec::new();
        let mut cache = IndexCache::new();
        assert!(matches!(
            resolve(&archives, "[", &mut cache),
            Err(Error::BadPattern(_))
        ));
    }
}
