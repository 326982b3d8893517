//! Catalog providers: where exporting parts come from.
//!
//! The locator only knows the [`CatalogProvider`] seam. The default
//! [`DirectoryCatalog`] activates parts listed in on-disk manifest files;
//! [`StaticCatalog`] serves a fixed in-memory part list for embedded hosts
//! and tests.
//!
//! Data-quality problems inside a directory (unparsable manifest, unknown
//! part key) are recoverable: the offending entry is skipped with a
//! warning and the scan continues. A directory that cannot be enumerated
//! at all fails the whole load, since a broken catalog would make every
//! subsequent resolve meaningless.

use crate::export::ExportingPart;
use crate::registry::PartRegistry;
use crate::settings::{BasePaths, DirectorySettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog directory unavailable: {path}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid search pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Produces the exporting parts of one configured directory.
///
/// Loads run outside any lock and must not share mutable state; the
/// locator calls them whenever it rebuilds a snapshot.
pub trait CatalogProvider: Send + Sync {
    /// Enumerates the parts a directory contributes, in discovery order.
    ///
    /// # Errors
    /// Returns `CatalogError` when the directory itself cannot be scanned;
    /// malformed entries within it are skipped instead.
    fn load(
        &self,
        dir: &DirectorySettings,
        paths: &BasePaths,
    ) -> Result<Vec<ExportingPart>, CatalogError>;
}

/// A part manifest file: the list of registered parts a deployment
/// activates from this directory.
#[derive(Debug, Deserialize)]
struct PartManifest {
    #[serde(default)]
    parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
struct PartEntry {
    /// Registered part key, as declared by `export_part!`.
    #[serde(rename = "type")]
    type_name: String,
}

/// Default provider: scans a directory for manifest files matching the
/// configured glob and resolves their part keys against the registry.
pub struct DirectoryCatalog {
    registry: &'static PartRegistry,
}

impl Default for DirectoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: PartRegistry::global(),
        }
    }

    fn parts_from_file(&self, file: &Path) -> Vec<ExportingPart> {
        let text = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(file = %file.display(), error = %error, "skipping unreadable manifest");
                return Vec::new();
            }
        };
        let manifest: PartManifest = match serde_saphyr::from_str(&text) {
            Ok(manifest) => manifest,
            Err(error) => {
                tracing::warn!(file = %file.display(), error = %error, "skipping malformed manifest");
                return Vec::new();
            }
        };

        manifest
            .parts
            .iter()
            .filter_map(|entry| {
                let Some(spec) = self.registry.get(&entry.type_name) else {
                    tracing::warn!(
                        file = %file.display(),
                        part = entry.type_name,
                        "manifest names an unregistered part; skipping"
                    );
                    return None;
                };
                Some(spec.to_part())
            })
            .collect()
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn load(
        &self,
        dir: &DirectorySettings,
        paths: &BasePaths,
    ) -> Result<Vec<ExportingPart>, CatalogError> {
        let root = dir.full_path(paths);
        let pattern =
            glob::Pattern::new(&dir.pattern).map_err(|source| CatalogError::InvalidPattern {
                pattern: dir.pattern.clone(),
                source,
            })?;

        let entries =
            std::fs::read_dir(&root).map_err(|source| CatalogError::DirectoryUnavailable {
                path: root.clone(),
                source,
            })?;

        // Sort by file name so discovery order is stable across platforms.
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| pattern.matches(name))
            })
            .collect();
        files.sort();

        let mut parts = Vec::new();
        for file in &files {
            parts.extend(self.parts_from_file(file));
        }
        tracing::debug!(
            directory = %root.display(),
            files = files.len(),
            parts = parts.len(),
            "catalog directory scanned"
        );
        Ok(parts)
    }
}

/// In-memory provider serving one fixed part list for every directory.
#[derive(Default)]
pub struct StaticCatalog {
    parts: Vec<ExportingPart>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(parts: Vec<ExportingPart>) -> Self {
        Self { parts }
    }
}

impl CatalogProvider for StaticCatalog {
    fn load(
        &self,
        _dir: &DirectorySettings,
        _paths: &BasePaths,
    ) -> Result<Vec<ExportingPart>, CatalogError> {
        Ok(self.parts.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::export::{BoxedExport, ExportDefinition, ImplementationHandle};
    use std::sync::Arc;

    pub trait Marker: Send + Sync {
        fn id(&self) -> u32;
    }

    crate::contract_identity!(dyn Marker = "catalog_tests.Marker");

    #[derive(Default)]
    pub struct MarkerImpl;

    impl Marker for MarkerImpl {
        fn id(&self) -> u32 {
            7
        }
    }

    crate::export_part! {
        MarkerImpl as "catalog_tests.MarkerImpl" {
            default => dyn Marker,
        }
    }

    #[derive(Default)]
    pub struct OtherMarkerImpl;

    impl Marker for OtherMarkerImpl {
        fn id(&self) -> u32 {
            8
        }
    }

    crate::export_part! {
        OtherMarkerImpl as "catalog_tests.OtherMarkerImpl" {
            default => dyn Marker,
        }
    }

    fn bases_for(dir: &Path) -> BasePaths {
        BasePaths {
            current: dir.to_path_buf(),
            module: dir.to_path_buf(),
            host: dir.to_path_buf(),
        }
    }

    fn dir_settings(pattern: &str) -> DirectorySettings {
        DirectorySettings {
            pattern: pattern.to_owned(),
            ..DirectorySettings::default()
        }
    }

    #[test]
    fn missing_directory_is_a_load_failure() {
        let settings = DirectorySettings {
            path: PathBuf::from("does-not-exist"),
            ..DirectorySettings::default()
        };
        let tmp = tempfile::tempdir().unwrap();

        let err = DirectoryCatalog::new()
            .load(&settings, &bases_for(tmp.path()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryUnavailable { .. }));
    }

    #[test]
    fn manifest_parts_resolve_against_registry() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("marker.part.yaml"),
            "parts:\n  - type: \"catalog_tests.MarkerImpl\"\n",
        )
        .unwrap();

        let parts = DirectoryCatalog::new()
            .load(&dir_settings("*.part.yaml"), &bases_for(tmp.path()))
            .unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(&*parts[0].exports[0].contract, "catalog_tests.Marker");
    }

    #[test]
    fn files_outside_the_pattern_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("marker.part.yaml"),
            "parts:\n  - type: \"catalog_tests.MarkerImpl\"\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("notes.txt"),
            "parts:\n  - type: \"catalog_tests.MarkerImpl\"\n",
        )
        .unwrap();

        let parts = DirectoryCatalog::new()
            .load(&dir_settings("*.part.yaml"), &bases_for(tmp.path()))
            .unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn malformed_manifest_and_unknown_part_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bad.part.yaml"), ":: not yaml ::").unwrap();
        std::fs::write(
            tmp.path().join("unknown.part.yaml"),
            "parts:\n  - type: \"catalog_tests.NoSuchPart\"\n  - type: \"catalog_tests.MarkerImpl\"\n",
        )
        .unwrap();

        let parts = DirectoryCatalog::new()
            .load(&dir_settings("*.part.yaml"), &bases_for(tmp.path()))
            .unwrap();

        // The bad file and the unknown key contribute nothing; the valid
        // entry in the same file still loads.
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn discovery_order_follows_sorted_file_names() {
        let tmp = tempfile::tempdir().unwrap();
        // Written out of sort order on purpose; the later-sorting file
        // holds the part that must come out last.
        std::fs::write(
            tmp.path().join("z.part.yaml"),
            "parts:\n  - type: \"catalog_tests.MarkerImpl\"\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("a.part.yaml"),
            "parts:\n  - type: \"catalog_tests.OtherMarkerImpl\"\n",
        )
        .unwrap();

        let parts = DirectoryCatalog::new()
            .load(&dir_settings("*.part.yaml"), &bases_for(tmp.path()))
            .unwrap();

        let names: Vec<_> = parts
            .iter()
            .map(|p| p.exports[0].implementation.type_name().to_owned())
            .collect();
        assert_eq!(
            names,
            ["catalog_tests.OtherMarkerImpl", "catalog_tests.MarkerImpl"]
        );
    }

    #[test]
    fn static_catalog_serves_fixed_parts() {
        fn factory() -> BoxedExport {
            Box::new(Arc::new(1u8))
        }

        let part = ExportingPart::new(vec![ExportDefinition::new(
            "catalog_tests.Fixed",
            ImplementationHandle::new("catalog_tests.FixedImpl", factory),
        )]);
        let provider = StaticCatalog::new(vec![part]);
        let tmp = tempfile::tempdir().unwrap();

        let parts = provider
            .load(&DirectorySettings::default(), &bases_for(tmp.path()))
            .unwrap();
        assert_eq!(parts.len(), 1);
    }
}
