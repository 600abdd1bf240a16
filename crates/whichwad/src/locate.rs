//! Archive discovery across a SteamPipe mod installation.
//!
//! SteamPipe splits a mod's content across sibling directories that share
//! the mod's name plus a layer suffix: `valve_addon`, `valve_hd`,
//! `valve_downloads` next to the base `valve` directory. Archives in the
//! layer directories override those in the base directory, so enumeration
//! walks the layers first (fixed suffix order) and the base directory last.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Alternate-content-layer suffixes, in enumeration priority order.
pub const STEAM_PIPE_SUFFIXES: [&str; 3] = ["_addon", "_hd", "_downloads"];

/// Stems of archives that ship with the game but never hold map textures.
pub const WAD_SKIP_LIST: [&str; 5] = ["cached", "fonts", "gfx", "spraypaint", "tempdecal"];

/// A candidate archive discovered under the installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadFile {
    /// Full path to the archive.
    pub path: PathBuf,
    /// File name without the `.wad` extension, used for exclusion matching.
    pub stem: String,
}

impl WadFile {
    /// File name including the extension, for display.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }
}

/// Strip a SteamPipe layer suffix from a mod path.
///
/// `.../Half-Life/valve_hd` names the HD content layer of the `valve` mod;
/// the canonical directory that owns the mod's primary archives is
/// `.../Half-Life/valve`. Paths without a layer suffix pass through
/// unchanged.
pub fn unsteampipe(mod_path: &Path) -> PathBuf {
    let Some(stem) = mod_path.file_name().and_then(|n| n.to_str()) else {
        return mod_path.to_path_buf();
    };

    for suffix in STEAM_PIPE_SUFFIXES {
        if stem.contains(suffix) {
            return mod_path.with_file_name(stem.replace(suffix, ""));
        }
    }

    mod_path.to_path_buf()
}

/// Discover candidate archives for a mod, layer directories first.
///
/// The returned order is significant: it fixes the prompt order when a
/// texture name is found in more than one archive. Within one directory,
/// archives are sorted by file name so repeated runs see the same order.
pub fn locate(mod_path: &Path) -> Result<Vec<WadFile>> {
    if !mod_path.is_dir() {
        return Err(Error::InvalidInstallPath(mod_path.to_path_buf()));
    }

    let mod_path = unsteampipe(mod_path);
    let mut found = Vec::new();

    if let (Some(game), Some(mod_name)) = (
        mod_path.parent(),
        mod_path.file_name().and_then(|n| n.to_str()),
    ) {
        for suffix in STEAM_PIPE_SUFFIXES {
            let layer = game.join(format!("{mod_name}{suffix}"));
            if layer.is_dir() {
                wads_in(&layer, &mut found)?;
            }
        }
    }

    if mod_path.is_dir() {
        wads_in(&mod_path, &mut found)?;
    }

    found.retain(|wad| {
        !WAD_SKIP_LIST
            .iter()
            .any(|skip| wad.stem.eq_ignore_ascii_case(skip))
    });

    Ok(found)
}

/// Append every `*.wad` directly inside `dir`, sorted by file name.
fn wads_in(dir: &Path, out: &mut Vec<WadFile>) -> Result<()> {
    let mut batch = Vec::new();

    for entry in dir.read_dir()? {
        let path = entry?.path();
        let is_wad = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("wad"));

        if is_wad && path.is_file() {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            batch.push(WadFile { path, stem });
        }
    }

    batch.sort_by(|a, b| a.path.cmp(&b.path));
    out.extend(batch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_unsteampipe_strips_layer_suffix() {
        assert_eq!(
            unsteampipe(Path::new("/games/Half-Life/valve_hd")),
            Path::new("/games/Half-Life/valve")
        );
        assert_eq!(
            unsteampipe(Path::new("/games/Half-Life/valve_addon")),
            Path::new("/games/Half-Life/valve")
        );
        assert_eq!(
            unsteampipe(Path::new("/games/Half-Life/valve")),
            Path::new("/games/Half-Life/valve")
        );
    }

    #[test]
    fn test_locate_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            locate(&missing),
            Err(Error::InvalidInstallPath(p)) if p == missing
        ));
    }

    #[test]
    fn test_layer_dirs_come_before_base() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("valve");
        let hd = dir.path().join("valve_hd");
        fs::create_dir(&base).unwrap();
        fs::create_dir(&hd).unwrap();
        touch(&base.join("custom.wad"));
        touch(&hd.join("custom.wad"));

        let found = locate(&base).unwrap();
        let paths: Vec<&Path> = found.iter().map(|w| w.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![hd.join("custom.wad").as_path(), base.join("custom.wad").as_path()]
        );

        // Same order when invoked through the layer directory itself
        let via_layer = locate(&hd).unwrap();
        assert_eq!(found, via_layer);
    }

    #[test]
    fn test_skip_list_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("valve");
        fs::create_dir(&base).unwrap();
        touch(&base.join("halflife.wad"));
        touch(&base.join("Cached.wad"));
        touch(&base.join("GFX.wad"));
        touch(&base.join("tempdecal.wad"));

        let found = locate(&base).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stem, "halflife");
    }

    #[test]
    fn test_non_wad_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("valve");
        fs::create_dir(&base).unwrap();
        touch(&base.join("liblist.gam"));
        touch(&base.join("decals.wad"));
        fs::create_dir(&base.join("maps")).unwrap();

        let found = locate(&base).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_name(), "decals.wad");
    }

    #[test]
    fn test_sorted_within_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("valve");
        fs::create_dir(&base).unwrap();
        touch(&base.join("zeus.wad"));
        touch(&base.join("alpha.wad"));
        touch(&base.join("mid.wad"));

        let found = locate(&base).unwrap();
        let stems: Vec<&str> = found.iter().map(|w| w.stem.as_str()).collect();
        assert_eq!(stems, vec!["alpha", "mid", "zeus"]);
    }
}
