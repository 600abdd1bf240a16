//! BMP encoding of indexed images.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{Error, IndexedImage, Result, PALETTE_ENTRIES, PIXEL_DATA_OFFSET};

/// Size of the BITMAPFILEHEADER in bytes.
const FILE_HEADER_SIZE: u32 = 14;

/// Size of the BITMAPINFOHEADER in bytes.
const INFO_HEADER_SIZE: u32 = 40;

/// Horizontal and vertical resolution in pixels per meter (96 DPI).
const RESOLUTION_PPM: u32 = 3780;

/// Encode an indexed image as a complete 8-bit BMP file.
///
/// The source pixel buffer is top-down row-major; BMP stores rows bottom-up,
/// so the row order is reversed. The source palette is RGB triples; BMP
/// stores BGR0 quadruples. Palettes with fewer than 256 entries are padded
/// with zero quadruples; palettes with more are rejected.
pub fn encode(image: &IndexedImage<'_>) -> Result<Vec<u8>> {
    if image.width == 0 || image.height == 0 {
        return Err(Error::ZeroDimension {
            width: image.width,
            height: image.height,
        });
    }

    let pixel_count = image.width as usize * image.height as usize;
    if image.pixels.len() != pixel_count {
        return Err(Error::PixelLengthMismatch {
            width: image.width,
            height: image.height,
            expected: pixel_count,
            actual: image.pixels.len(),
        });
    }

    let file_size = PIXEL_DATA_OFFSET + pixel_count as u32;
    let mut out = Vec::with_capacity(file_size as usize);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.write_u32::<LittleEndian>(file_size)?;
    out.write_u32::<LittleEndian>(0)?; // reserved
    out.write_u32::<LittleEndian>(PIXEL_DATA_OFFSET)?;

    // BITMAPINFOHEADER
    out.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    out.write_u32::<LittleEndian>(image.width)?;
    out.write_u32::<LittleEndian>(image.height)?;
    out.write_u16::<LittleEndian>(1)?; // color planes
    out.write_u16::<LittleEndian>(8)?; // bits per pixel
    out.write_u32::<LittleEndian>(0)?; // compression (none)
    out.write_u32::<LittleEndian>(pixel_count as u32)?; // image data size
    out.write_u32::<LittleEndian>(RESOLUTION_PPM)?;
    out.write_u32::<LittleEndian>(RESOLUTION_PPM)?;
    out.write_u32::<LittleEndian>(PALETTE_ENTRIES as u32)?; // colors used
    out.write_u32::<LittleEndian>(PALETTE_ENTRIES as u32)?; // important colors

    out.extend_from_slice(&convert_palette(image.palette)?);
    out.extend_from_slice(&flip_rows(image.pixels, image.width as usize));

    debug_assert_eq!(out.len(), file_size as usize);
    Ok(out)
}

/// Convert an RGB triple palette to exactly 256 BGR0 quadruples.
fn convert_palette(palette: &[u8]) -> Result<Vec<u8>> {
    if palette.len() % 3 != 0 {
        return Err(Error::PartialPaletteEntry(palette.len()));
    }

    let entries = palette.len() / 3;
    if entries > PALETTE_ENTRIES {
        return Err(Error::PaletteTooLarge(entries));
    }

    let mut out = Vec::with_capacity(PALETTE_ENTRIES * 4);
    for rgb in palette.chunks_exact(3) {
        out.extend_from_slice(&[rgb[2], rgb[1], rgb[0], 0]);
    }
    out.resize(PALETTE_ENTRIES * 4, 0);
    Ok(out)
}

/// Reverse the row order of a top-down pixel buffer.
///
/// Rows are `width` bytes each (one palette index per pixel). The buffer
/// length must already be validated as an exact multiple of `width`.
fn flip_rows(pixels: &[u8], width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    for row in pixels.chunks_exact(width).rev() {
        out.extend_from_slice(row);
    }
    out
}
