//! Pure predicates deciding which filesystem entries are packaged.
//!
//! Classification is exact-match on the file extension (including the
//! leading dot), case-sensitive, no globbing. Paths without an extension
//! are never source and never metadata.

use std::collections::BTreeSet;
use std::path::Path;

/// Extension that marks a file as a metadata descriptor.
pub const METADATA_EXT: &str = ".json";

/// Immutable allow-list of source extensions for one packaging target.
///
/// Built once per packager and never mutated afterwards; the collector
/// borrows it for the duration of a collection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRule {
    keep: BTreeSet<String>,
}

impl ClassificationRule {
    /// Build a rule from extensions written with their leading dot
    /// (e.g. `[".go", ".mod"]`).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keep: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff `path` has an extension and that extension is in the
    /// allow-list.
    pub fn is_source(&self, path: &Path) -> bool {
        match extension_of(path) {
            Some(ext) => self.keep.contains(&ext),
            None => false,
        }
    }

    /// The configured extensions, for diagnostics.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.keep.iter().map(String::as_str)
    }
}

/// True iff `path` ends in `.json`.
pub fn is_metadata(path: &Path) -> bool {
    extension_of(path).as_deref() == Some(METADATA_EXT)
}

/// Extension of `path` including the leading dot, or `None` for paths
/// without one (this also covers dotfiles like `.json`, which have no
/// extension in the `Path` sense) and for non-UTF-8 extensions.
fn extension_of(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    Some(format!(".{ext}"))
}
