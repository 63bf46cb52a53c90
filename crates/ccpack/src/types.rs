//! Core data types for the packaging pipeline.

use std::path::PathBuf;

/// Single file to add to an archive: where the entry lives inside the
/// archive and where its bytes come from on disk.
///
/// `logical_name` is POSIX-style (forward slashes) regardless of host OS and
/// must be unique within one archive; the builder rejects collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    /// Relative path the entry will have inside the archive (e.g.
    /// `META-INF/statedb/couchdb/indexes/idx1.json`).
    pub logical_name: String,
    /// Absolute filesystem path to read content from.
    pub source_path: PathBuf,
}

impl ArchiveDescriptor {
    pub fn new(logical_name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            logical_name: logical_name.into(),
            source_path: source_path.into(),
        }
    }
}
