//! Packaging orchestration contract.
//!
//! A packager variant exists per target ecosystem's source-tree convention
//! (see [`crate::lang`]). The trait carries the shared orchestration as a
//! provided method; variants supply only the allow-list and the source
//! discovery policy. There is deliberately no general implementation, so
//! "instantiating the abstract packager" is a compile error rather than a
//! runtime check.

use crate::archive;
use crate::classify::ClassificationRule;
use crate::collect;
use crate::error::PackageResult;
use crate::types::ArchiveDescriptor;
use std::io::Write;
use std::path::Path;

pub trait Packager {
    /// Extension allow-list deciding what counts as source for this target.
    fn rule(&self) -> &ClassificationRule;

    /// Discover source descriptors under `source_root`, with logical names
    /// chosen by this target's layout convention.
    fn find_source(&self, source_root: &Path) -> PackageResult<Vec<ArchiveDescriptor>>;

    /// Package `source_root` (and, if given, the `.json` tree under
    /// `metadata_root`) into a deterministic tar.gz written to `dest`.
    ///
    /// Default orchestration: source entries first, metadata entries second,
    /// each group sorted by logical name so that directory enumeration order
    /// never reaches the output bytes. Variants with a different ordering
    /// policy override this method.
    fn package<W: Write>(
        &self,
        source_root: &Path,
        metadata_root: Option<&Path>,
        dest: W,
    ) -> PackageResult<()> {
        let mut descriptors = self.find_source(source_root)?;
        descriptors.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));

        if let Some(metadata_root) = metadata_root {
            let mut metadata = collect::collect_metadata(metadata_root)?;
            metadata.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
            descriptors.extend(metadata);
        }

        tracing::debug!(
            source_root = %source_root.display(),
            entries = descriptors.len(),
            "building package archive"
        );
        archive::build_tar_gz(dest, &descriptors)
    }

    /// [`Packager::package`] into an in-memory buffer.
    fn package_to_vec(
        &self,
        source_root: &Path,
        metadata_root: Option<&Path>,
    ) -> PackageResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.package(source_root, metadata_root, &mut buf)?;
        Ok(buf)
    }
}
