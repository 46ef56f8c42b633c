//! Error types for archive extraction.
//!
//! Every failure is sorted into one of three kinds a caller can act on:
//! the archive is missing, the archive is malformed, or access was denied.
//! Anything else is reported as a plain I/O error.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Coarse classification of an [`ExtractError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Permission,
    Io,
}

/// Main error type for extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The archive (or another required path) does not exist
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading the archive or writing the destination was refused
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a well-formed zip archive
    #[error("invalid zip archive: {0}")]
    Format(String),

    /// The entry uses a compression method other than STORED or DEFLATE
    #[error("unsupported compression method {method} for {name}")]
    UnsupportedMethod { name: String, method: u16 },

    /// Any other I/O failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExtractError {
    /// Build a format error from any displayable message
    pub fn format(msg: impl Into<String>) -> Self {
        ExtractError::Format(msg.into())
    }

    /// Classify an I/O error raised while touching `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => ExtractError::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => ExtractError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::NotFound { .. } => ErrorKind::NotFound,
            ExtractError::PermissionDenied { .. } => ErrorKind::Permission,
            ExtractError::Format(_) | ExtractError::UnsupportedMethod { .. } => ErrorKind::Format,
            ExtractError::Io { .. } => ErrorKind::Io,
        }
    }
}
