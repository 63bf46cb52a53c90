//! Concrete packagers, one per supported chaincode ecosystem.
//!
//! Each variant is a thin configuration of the shared machinery: an
//! extension allow-list plus a logical-name convention. Both pack source
//! under a fixed `src/` prefix relative to the source root, which is the
//! layout installers expect.

use crate::classify::ClassificationRule;
use crate::collect;
use crate::error::PackageResult;
use crate::packager::Packager;
use crate::types::ArchiveDescriptor;
use std::path::Path;

/// Prefix source entries carry inside the archive.
pub const SOURCE_PREFIX: &str = "src/";

/// Go chaincode: Go sources, cgo companions, and module files.
#[derive(Debug, Clone)]
pub struct GolangPackager {
    rule: ClassificationRule,
}

impl GolangPackager {
    pub fn new() -> Self {
        Self {
            rule: ClassificationRule::new([".go", ".c", ".h", ".s", ".mod", ".sum"]),
        }
    }
}

impl Default for GolangPackager {
    fn default() -> Self {
        Self::new()
    }
}

impl Packager for GolangPackager {
    fn rule(&self) -> &ClassificationRule {
        &self.rule
    }

    fn find_source(&self, source_root: &Path) -> PackageResult<Vec<ArchiveDescriptor>> {
        collect::collect_descriptors(source_root, SOURCE_PREFIX, |p| self.rule.is_source(p))
    }
}

/// Node.js chaincode: scripts, TypeScript sources, and JSON manifests
/// (`package.json` travels with the code).
#[derive(Debug, Clone)]
pub struct NodePackager {
    rule: ClassificationRule,
}

impl NodePackager {
    pub fn new() -> Self {
        Self {
            rule: ClassificationRule::new([".js", ".ts", ".json"]),
        }
    }
}

impl Default for NodePackager {
    fn default() -> Self {
        Self::new()
    }
}

impl Packager for NodePackager {
    fn rule(&self) -> &ClassificationRule {
        &self.rule
    }

    fn find_source(&self, source_root: &Path) -> PackageResult<Vec<ArchiveDescriptor>> {
        collect::collect_descriptors(source_root, SOURCE_PREFIX, |p| self.rule.is_source(p))
    }
}
