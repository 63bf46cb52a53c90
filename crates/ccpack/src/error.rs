//! Error types for packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for packaging operations.
pub type PackageResult<T> = Result<T, PackageError>;

/// Errors that can occur while collecting descriptors or building an archive.
///
/// Any error aborts the operation that produced it; a partially written
/// destination is never a valid archive and callers should discard it.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Directory walk failed (missing root, permission denied, ...).
    /// Aborts the collection pass that hit it; never retried.
    #[error("directory walk failed under '{path}': {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A discovered file could not be read back at build time.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A discovered file yielded no content. Empty entries are refused
    /// rather than packed as zero-byte archive members.
    #[error("refusing to pack empty file '{path}'")]
    EmptyFile { path: PathBuf },

    /// Two descriptors resolved to the same logical name.
    #[error("duplicate archive entry '{name}'")]
    DuplicateEntry { name: String },

    /// Logical name is empty, absolute, or escapes the archive root.
    #[error("invalid archive entry name '{name}'")]
    InvalidName { name: String },

    /// The tar stream or the destination writer failed.
    #[error("archive write failed: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// The gzip encoder failed to finalize the compressed stream.
    #[error("gzip compression failed: {source}")]
    Compression {
        #[source]
        source: std::io::Error,
    },
}

impl PackageError {
    /// Returns true if this error came from the descriptor-collection phase.
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::Traversal { .. })
    }

    /// Returns true if this error names a descriptor the caller handed in
    /// (collision or malformed logical name), as opposed to an I/O failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::DuplicateEntry { .. } | Self::InvalidName { .. })
    }
}
