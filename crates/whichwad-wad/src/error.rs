//! Error types for WAD handling.

use thiserror::Error;

/// Errors that can occur when reading a WAD archive.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid WAD magic.
    #[error("invalid WAD magic: expected 'WAD3', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Structurally invalid archive.
    #[error("malformed WAD: {0}")]
    Malformed(String),

    /// Lump or texture data extends past the end of the file.
    #[error("truncated WAD: {what} needs {needed} bytes at offset {offset}, file has {available}")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Lump uses compression, which WAD3 reserves but never shipped.
    #[error("lump '{0}' is compressed; compressed lumps are not supported")]
    CompressedLump(String),

    /// The requested texture name is not present in the archive.
    ///
    /// Distinct from the structural errors above: the archive itself parsed
    /// fine, the name just is not in its directory.
    #[error("texture '{0}' not found in archive")]
    TextureNotFound(String),
}

/// Result type for WAD operations.
pub type Result<T> = std::result::Result<T, Error>;
