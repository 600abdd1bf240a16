//! 8-bit indexed BMP encoding.
//!
//! GoldSrc WAD textures store their pixels top-down with an RGB triple
//! palette; BMP stores rows bottom-up with a BGR0 quadruple palette. This
//! crate performs that conversion and emits a byte-exact BMP file:
//!
//! - 14-byte file header, 40-byte info header
//! - exactly 256 palette quadruples (sources with fewer entries are padded)
//! - pixel data at a fixed offset of 1078
//!
//! # Example
//!
//! ```
//! use whichwad_bmp::{encode, IndexedImage};
//!
//! let pixels = vec![0u8; 16 * 16];
//! let palette = vec![0u8; 3 * 256];
//! let bmp = encode(&IndexedImage {
//!     width: 16,
//!     height: 16,
//!     pixels: &pixels,
//!     palette: &palette,
//! })?;
//! assert_eq!(bmp.len(), 1078 + 16 * 16);
//! # Ok::<(), whichwad_bmp::Error>(())
//! ```

mod encode;
mod error;

pub use encode::encode;
pub use error::{Error, Result};

/// Offset of the pixel data from the start of the file:
/// file header (14) + info header (40) + palette (4 * 256).
pub const PIXEL_DATA_OFFSET: u32 = 1078;

/// Number of palette entries an 8-bit BMP carries.
pub const PALETTE_ENTRIES: usize = 256;

/// An indexed-color image as decoded from a WAD texture lump.
///
/// `pixels` holds one palette index per pixel in row-major, top-down order
/// and must be exactly `width * height` bytes. `palette` holds consecutive
/// RGB byte triples.
#[derive(Debug, Clone, Copy)]
pub struct IndexedImage<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
    pub palette: &'a [u8],
}
