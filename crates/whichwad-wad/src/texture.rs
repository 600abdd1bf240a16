//! Texture lump decoding.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// A fully decoded texture: dimensions, the full-resolution pixel plane
/// (top-down, row-major, one palette index per pixel) and the RGB palette.
#[derive(Debug, Clone)]
pub struct MipTexture {
    /// Canonical (uppercase) texture name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Mip-0 pixel bytes, `width * height` palette indices.
    pub pixels: Vec<u8>,
    /// Palette as consecutive RGB triples.
    pub palette: Vec<u8>,
}

/// On-disk miptex lump header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct MipTexHeader {
    name: [u8; 16],
    width: u32,
    height: u32,
    /// Offsets of the four mip levels, relative to the lump start.
    mip_offsets: [u32; 4],
}

impl MipTexHeader {
    const SIZE: usize = 40;
}

/// Slice `len` bytes at `offset`, reporting a truncation error on overrun.
fn slice<'a>(data: &'a [u8], offset: usize, len: usize, what: &'static str) -> Result<&'a [u8]> {
    let end = offset.checked_add(len).ok_or(Error::Truncated {
        what,
        offset,
        needed: len,
        available: data.len(),
    })?;
    if end > data.len() {
        return Err(Error::Truncated {
            what,
            offset,
            needed: len,
            available: data.len(),
        });
    }
    Ok(&data[offset..end])
}

fn read_u32(data: &[u8], offset: usize, what: &'static str) -> Result<u32> {
    let bytes = slice(data, offset, 4, what)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u16(data: &[u8], offset: usize, what: &'static str) -> Result<u16> {
    let bytes = slice(data, offset, 2, what)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read the palette that follows a texture's pixel data: a little-endian
/// u16 color count, then that many RGB triples.
fn read_palette(data: &[u8], offset: usize) -> Result<Vec<u8>> {
    let count = read_u16(data, offset, "palette color count")? as usize;
    if count > 256 {
        return Err(Error::Malformed(format!(
            "palette color count {count} exceeds 256"
        )));
    }
    Ok(slice(data, offset + 2, count * 3, "palette")?.to_vec())
}

/// Decode a miptex lump (type 0x43): 40-byte header, four mip planes,
/// palette after the smallest mip.
pub(crate) fn decode_miptex(data: &[u8], name: &str) -> Result<MipTexture> {
    let header_bytes = slice(data, 0, MipTexHeader::SIZE, "miptex header")?;
    let header = MipTexHeader::read_from_bytes(header_bytes)
        .map_err(|e| Error::Malformed(format!("miptex header: {e:?}")))?;

    let width = header.width;
    let height = header.height;
    if width == 0 || height == 0 {
        return Err(Error::Malformed(format!(
            "texture '{name}' has zero dimension {width}x{height}"
        )));
    }

    let mip_offsets = header.mip_offsets;
    let pixel_count = width as usize * height as usize;
    let pixels = slice(data, mip_offsets[0] as usize, pixel_count, "mip 0 pixels")?.to_vec();

    // The palette sits after the smallest mip (one eighth scale each axis).
    let mip3_len = (width as usize / 8) * (height as usize / 8);
    let palette = read_palette(data, mip_offsets[3] as usize + mip3_len)?;

    Ok(MipTexture {
        name: name.to_string(),
        width,
        height,
        pixels,
        palette,
    })
}

/// Decode a qpic lump (type 0x42): width, height, one pixel plane, palette.
pub(crate) fn decode_qpic(data: &[u8], name: &str) -> Result<MipTexture> {
    let width = read_u32(data, 0, "qpic width")?;
    let height = read_u32(data, 4, "qpic height")?;
    if width == 0 || height == 0 {
        return Err(Error::Malformed(format!(
            "image '{name}' has zero dimension {width}x{height}"
        )));
    }

    let pixel_count = width as usize * height as usize;
    let pixels = slice(data, 8, pixel_count, "qpic pixels")?.to_vec();
    let palette = read_palette(data, 8 + pixel_count)?;

    Ok(MipTexture {
        name: name.to_string(),
        width,
        height,
        pixels,
        palette,
    })
}
