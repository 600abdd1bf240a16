//! WAD3 archive reader.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::texture::{decode_miptex, decode_qpic, MipTexture};
use crate::{Error, Result, WAD3_MAGIC};

/// On-disk WAD file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct WadHeader {
    magic: [u8; 4],
    lump_count: u32,
    dir_offset: u32,
}

impl WadHeader {
    const SIZE: usize = 12;
}

/// On-disk directory entry, one per lump.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct DirEntry {
    file_pos: u32,
    disk_size: u32,
    full_size: u32,
    lump_type: u8,
    compression: u8,
    pad: u16,
    name: [u8; 16],
}

impl DirEntry {
    const SIZE: usize = 32;
}

/// Lump types that carry an indexed raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LumpKind {
    /// Type 0x42: flat image (width, height, pixels, palette).
    Qpic,
    /// Type 0x43: mipmapped texture.
    MipTex,
}

/// Location of a texture lump within the mapped file.
#[derive(Debug, Clone, Copy)]
struct LumpDesc {
    offset: usize,
    size: usize,
    kind: LumpKind,
}

/// A read-only WAD3 archive with its texture directory parsed up front.
///
/// The file is memory-mapped; texture pixel data is decoded on demand via
/// [`WadArchive::read_texture`]. Texture names are canonicalized to
/// uppercase at parse time, and all name lookups go through the same
/// canonicalization.
pub struct WadArchive {
    mmap: Mmap,
    path: PathBuf,
    name: String,
    textures: BTreeMap<String, LumpDesc>,
}

impl WadArchive {
    /// Open a WAD3 archive and parse its lump directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let textures = Self::parse_directory(&mmap)?;

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            name,
            textures,
        })
    }

    /// Archive file name, e.g. `halflife.wad`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the archive was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of textures in the directory.
    #[inline]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Iterate over canonical (uppercase) texture names.
    #[inline]
    pub fn texture_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.textures.keys().map(String::as_str)
    }

    /// Check whether a texture name exists in the directory.
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(&name.to_ascii_uppercase())
    }

    /// Decode a texture by name.
    ///
    /// Returns [`Error::TextureNotFound`] if the name is not in the
    /// directory; structural errors if the lump data is truncated or
    /// malformed.
    pub fn read_texture(&self, name: &str) -> Result<MipTexture> {
        let canonical = name.to_ascii_uppercase();
        let desc = self
            .textures
            .get(&canonical)
            .ok_or_else(|| Error::TextureNotFound(canonical.clone()))?;

        let data = &self.mmap[desc.offset..desc.offset + desc.size];
        match desc.kind {
            LumpKind::MipTex => decode_miptex(data, &canonical),
            LumpKind::Qpic => decode_qpic(data, &canonical),
        }
    }

    fn parse_directory(data: &[u8]) -> Result<BTreeMap<String, LumpDesc>> {
        if data.len() < WadHeader::SIZE {
            return Err(Error::Truncated {
                what: "WAD header",
                offset: 0,
                needed: WadHeader::SIZE,
                available: data.len(),
            });
        }

        let header = WadHeader::read_from_bytes(&data[..WadHeader::SIZE])
            .map_err(|e| Error::Malformed(format!("WAD header: {e:?}")))?;

        let magic = header.magic;
        if &magic != WAD3_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let lump_count = header.lump_count as usize;
        let dir_offset = header.dir_offset as usize;
        let dir_len = lump_count
            .checked_mul(DirEntry::SIZE)
            .ok_or_else(|| Error::Malformed("lump count overflow".into()))?;

        if dir_offset.checked_add(dir_len).map_or(true, |end| end > data.len()) {
            return Err(Error::Truncated {
                what: "lump directory",
                offset: dir_offset,
                needed: dir_len,
                available: data.len(),
            });
        }

        let mut textures = BTreeMap::new();

        for chunk in data[dir_offset..dir_offset + dir_len].chunks_exact(DirEntry::SIZE) {
            let entry = DirEntry::read_from_bytes(chunk)
                .map_err(|e| Error::Malformed(format!("directory entry: {e:?}")))?;

            let kind = match entry.lump_type {
                0x42 => LumpKind::Qpic,
                0x43 => LumpKind::MipTex,
                _ => continue,
            };

            let name = lump_name(&entry.name)?;

            if entry.compression != 0 {
                return Err(Error::CompressedLump(name));
            }

            let offset = entry.file_pos as usize;
            let size = entry.disk_size as usize;
            if offset.checked_add(size).map_or(true, |end| end > data.len()) {
                return Err(Error::Truncated {
                    what: "lump data",
                    offset,
                    needed: size,
                    available: data.len(),
                });
            }

            textures.insert(name, LumpDesc { offset, size, kind });
        }

        Ok(textures)
    }
}

/// Decode a null-padded 16-byte lump name to its canonical uppercase form.
fn lump_name(raw: &[u8; 16]) -> Result<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let name = std::str::from_utf8(&raw[..end])
        .map_err(|_| Error::Malformed(format!("non-UTF-8 lump name {:?}", &raw[..end])))?;
    Ok(name.to_ascii_uppercase())
}
