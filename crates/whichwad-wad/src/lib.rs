//! WAD3 texture archive reading for GoldSrc games.
//!
//! A WAD3 file is a flat container of "lumps" with a directory at the end of
//! the file. Texture lumps (miptex, type 0x43) carry four mip levels of
//! indexed pixels and a 256-entry RGB palette; qpic lumps (type 0x42) carry
//! a single plane. This crate memory-maps an archive, parses its directory
//! once, and decodes individual textures on demand.
//!
//! Texture names are canonicalized to uppercase, both in the directory and
//! for lookups, so callers never depend on the casing an archive happens to
//! ship with.
//!
//! # Example
//!
//! ```no_run
//! use whichwad_wad::WadArchive;
//!
//! let archive = WadArchive::open("halflife.wad")?;
//! if archive.contains("SKY1") {
//!     let texture = archive.read_texture("SKY1")?;
//!     println!("{} is {}x{}", texture.name, texture.width, texture.height);
//! }
//! # Ok::<(), whichwad_wad::Error>(())
//! ```

mod archive;
mod error;
mod texture;

pub use archive::WadArchive;
pub use error::{Error, Result};
pub use texture::MipTexture;

/// WAD3 file magic bytes.
pub const WAD3_MAGIC: &[u8; 4] = b"WAD3";
