//! Deterministic tar.gz construction.
//!
//! Entries are appended strictly in the order given, with every variable
//! header field pinned (mtime 0, uid/gid 0, mode 0644) and a gzip envelope
//! that is itself reproducible (mtime 0, OS byte 255). Packaging the same
//! logical inputs twice therefore yields byte-identical output, which is
//! what hash-based package identity downstream depends on.

use crate::error::{PackageError, PackageResult};
use crate::types::ArchiveDescriptor;
use flate2::{Compression, GzBuilder};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::Write;
use tar::{Builder, Header};

/// Build a gzip-compressed tar archive from `descriptors` into `dest`.
///
/// The builder does not reorder: callers impose any sort they need first.
/// Each file is read fully into memory before its entry is appended, so
/// archive byte layout never depends on I/O interleaving and peak memory is
/// bounded by the largest single file. Bytes flow through the compressor to
/// `dest` incrementally as entries are appended.
///
/// Fails without emitting a "finalize" signal if any name is invalid or
/// duplicated, any file cannot be read or is empty, or the destination or
/// compressor errors; a failed build never leaves `dest` holding a valid
/// archive.
pub fn build_tar_gz<W: Write>(dest: W, descriptors: &[ArchiveDescriptor]) -> PackageResult<()> {
    validate_names(descriptors)?;

    let gz = GzBuilder::new()
        .mtime(0)
        .operating_system(255) // unknown, for cross-platform determinism
        .write(dest, Compression::default());
    let mut tar = Builder::new(gz);
    tar.mode(tar::HeaderMode::Deterministic);

    for descriptor in descriptors {
        let data =
            std::fs::read(&descriptor.source_path).map_err(|source| PackageError::Read {
                path: descriptor.source_path.clone(),
                source,
            })?;
        if data.is_empty() {
            return Err(PackageError::EmptyFile {
                path: descriptor.source_path.clone(),
            });
        }
        append_entry(&mut tar, &descriptor.logical_name, &data)?;
    }

    // into_inner writes the tar end-of-archive blocks; finish flushes the
    // gzip trailer.
    let gz = tar
        .into_inner()
        .map_err(|source| PackageError::Write { source })?;
    gz.finish()
        .map_err(|source| PackageError::Compression { source })?;
    Ok(())
}

/// Convenience wrapper building the archive in memory.
pub fn build_tar_gz_vec(descriptors: &[ArchiveDescriptor]) -> PackageResult<Vec<u8>> {
    let mut buf = Vec::new();
    build_tar_gz(&mut buf, descriptors)?;
    Ok(buf)
}

/// SHA-256 of the full archive bytes, hex-encoded. This is the identity
/// installers key on; it is stable because the archive itself is.
pub fn archive_digest(descriptors: &[ArchiveDescriptor]) -> PackageResult<String> {
    let bytes = build_tar_gz_vec(descriptors)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

fn append_entry<W: Write>(tar: &mut Builder<W>, name: &str, data: &[u8]) -> PackageResult<()> {
    let mut header = Header::new_gnu();
    header
        .set_path(name)
        .map_err(|_| PackageError::InvalidName {
            name: name.to_string(),
        })?;
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_cksum();
    tar.append(&header, data)
        .map_err(|source| PackageError::Write { source })
}

/// Logical names must be unique, non-empty, relative, and confined to the
/// archive root. Checked up front so nothing is written for a bad input set.
fn validate_names(descriptors: &[ArchiveDescriptor]) -> PackageResult<()> {
    let mut seen = HashSet::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let name = descriptor.logical_name.as_str();
        if name.is_empty()
            || name.starts_with('/')
            || name
                .split('/')
                .any(|part| part.is_empty() || part == "." || part == "..")
        {
            return Err(PackageError::InvalidName {
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(PackageError::DuplicateEntry {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
