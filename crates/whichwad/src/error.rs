//! Error types for the search core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when locating archives and resolving patterns.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied mod path does not exist or is not a directory.
    #[error("{} is not a directory", .0.display())]
    InvalidInstallPath(PathBuf),

    /// A search pattern is not valid shell-glob syntax.
    #[error("invalid search pattern: {0}")]
    BadPattern(#[from] glob::PatternError),

    /// I/O error while enumerating directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, Error>;
