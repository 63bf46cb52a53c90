//! Deterministic chaincode packaging.
//!
//! Discovers source and metadata files under per-ecosystem rules and
//! serializes them into a byte-for-byte reproducible tar.gz archive:
//! identical logical inputs produce identical archive bytes regardless of
//! filesystem timestamps, enumeration order, or host path conventions.

pub mod archive;
pub mod classify;
pub mod collect;
pub mod error;
pub mod lang;
pub mod packager;
pub mod types;

// Convenience re-exports
pub use archive::{archive_digest, build_tar_gz, build_tar_gz_vec};
pub use classify::{is_metadata, ClassificationRule, METADATA_EXT};
pub use collect::{collect_descriptors, collect_metadata, METADATA_PREFIX};
pub use error::{PackageError, PackageResult};
pub use lang::{GolangPackager, NodePackager, SOURCE_PREFIX};
pub use packager::Packager;
pub use types::ArchiveDescriptor;
