//! Recursive descriptor collection.
//!
//! Walks a directory tree in filesystem enumeration order (deliberately not
//! sorted here; the packager sorts logical names before building so output
//! bytes never depend on enumeration order) and turns every regular file
//! that passes a predicate into an [`ArchiveDescriptor`]. Directories and
//! non-regular files (symlinks, devices) are skipped silently.

use crate::classify;
use crate::error::{PackageError, PackageResult};
use crate::types::ArchiveDescriptor;
use std::path::{Component, Path};

/// Prefix metadata entries carry inside the archive.
pub const METADATA_PREFIX: &str = "META-INF/";

/// Collect descriptors for every `.json` file under `root`, arbitrarily
/// nested, named `META-INF/<path relative to root>`.
pub fn collect_metadata(root: &Path) -> PackageResult<Vec<ArchiveDescriptor>> {
    let descriptors = collect_descriptors(root, METADATA_PREFIX, classify::is_metadata)?;
    tracing::debug!(
        root = %root.display(),
        count = descriptors.len(),
        "collected metadata descriptors"
    );
    Ok(descriptors)
}

/// Shared walk-plus-predicate machinery: collect a descriptor for every
/// regular file under `root` where `keep` holds, with logical name
/// `<prefix><relative path>` using `/` separators on every host.
///
/// Fails with [`PackageError::Traversal`] if the walk itself errors
/// (missing root, permission denied); the error names the directory that
/// could not be enumerated.
pub fn collect_descriptors(
    root: &Path,
    prefix: &str,
    keep: impl Fn(&Path) -> bool,
) -> PackageResult<Vec<ArchiveDescriptor>> {
    let mut out = Vec::new();
    collect_inner(root, root, prefix, &keep, &mut out)?;
    Ok(out)
}

fn collect_inner(
    root: &Path,
    dir: &Path,
    prefix: &str,
    keep: &impl Fn(&Path) -> bool,
    out: &mut Vec<ArchiveDescriptor>,
) -> PackageResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| PackageError::Traversal {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| PackageError::Traversal {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let ft = entry
            .file_type()
            .map_err(|source| PackageError::Traversal {
                path: path.clone(),
                source,
            })?;
        if ft.is_dir() {
            collect_inner(root, &path, prefix, keep, out)?;
        } else if ft.is_file() && keep(&path) {
            let Some(relative) = posix_relative(root, &path) else {
                tracing::warn!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            };
            out.push(ArchiveDescriptor::new(
                format!("{prefix}{relative}"),
                path,
            ));
        }
        // Symlinks and other non-regular entries fall through: expected
        // filtering, not a failure.
    }
    Ok(())
}

/// Relative path from `root` to `path` joined with `/`, independent of the
/// host separator. `None` if any component is not valid UTF-8.
fn posix_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            // strip_prefix output is normal components only; anything else
            // means the path escaped the root.
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
