//! Error types for BMP encoding.

use thiserror::Error;

/// Errors that can occur when encoding a BMP file.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image has a zero dimension.
    #[error("image dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    /// Pixel buffer length does not match the image dimensions.
    #[error("pixel buffer length mismatch: expected {expected} ({width}x{height}), got {actual}")]
    PixelLengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Palette buffer length is not a whole number of RGB triples.
    #[error("palette length {0} is not a multiple of 3")]
    PartialPaletteEntry(usize),

    /// Palette holds more entries than an 8-bit BMP can address.
    #[error("palette has {0} entries, at most 256 are allowed")]
    PaletteTooLarge(usize),
}

/// Result type for BMP operations.
pub type Result<T> = std::result::Result<T, Error>;
