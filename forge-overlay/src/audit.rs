//! Drift report for the overlay tree.
//!
//! Overrides silently stop mattering when upstream renames or deletes the
//! file they shadow. [`DriftReport::scan`] walks the overlay tree and checks,
//! for every overlay file, whether upstream still has a file at the same
//! relative path.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::fs::FileSystem;
use crate::source::SourceTree;

/// How an overlay file relates to upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OverrideStatus {
    /// Upstream has a file at the same relative path, which this one hides.
    Shadows { upstream: PathBuf },

    /// Upstream has nothing at this path.
    OverlayOnly,
}

impl OverrideStatus {
    /// Check if the file hides an upstream file.
    pub fn is_shadowing(&self) -> bool {
        matches!(self, OverrideStatus::Shadows { .. })
    }
}

/// One overlay file and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideEntry {
    /// Path relative to the overlay root.
    pub relative: PathBuf,

    /// Absolute overlay path.
    pub overlay: PathBuf,

    /// Relation to upstream.
    #[serde(flatten)]
    pub status: OverrideStatus,
}

/// Every overlay file, classified, sorted by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    entries: Vec<OverrideEntry>,
}

impl DriftReport {
    /// Walk the overlay tree and classify each file.
    ///
    /// A missing overlay root gives an empty report.
    pub fn scan(fs: &dyn FileSystem, tree: &SourceTree) -> io::Result<Self> {
        let overlay_root = tree.overlay().path();
        let upstream_root = tree.upstream().path();

        let mut files = Vec::new();
        if fs.is_dir(overlay_root) {
            collect_files(fs, overlay_root, Path::new(""), &mut files)?;
        }

        let mut entries: Vec<OverrideEntry> = files
            .into_par_iter()
            .map(|relative| {
                let upstream = upstream_root.join(&relative);
                let status = if fs.is_file(&upstream) {
                    OverrideStatus::Shadows { upstream }
                } else {
                    OverrideStatus::OverlayOnly
                };
                OverrideEntry {
                    overlay: overlay_root.join(&relative),
                    relative,
                    status,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.relative.cmp(&b.relative));

        let report = Self { entries };
        info!(
            overlay = %overlay_root.display(),
            files = report.len(),
            shadowing = report.shadowing().count(),
            overlay_only = report.overlay_only().count(),
            "Overlay drift scan complete"
        );
        Ok(report)
    }

    /// All entries.
    pub fn entries(&self) -> &[OverrideEntry] {
        &self.entries
    }

    /// Entries that hide an upstream file.
    pub fn shadowing(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.iter().filter(|e| e.status.is_shadowing())
    }

    /// Entries with no upstream counterpart.
    pub fn overlay_only(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.iter().filter(|e| !e.status.is_shadowing())
    }

    /// Number of overlay files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the overlay tree has no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Recursively collect file paths relative to `root`.
///
/// Symlinked directories are skipped, so a link back to an ancestor cannot loop.
fn collect_files(
    fs: &dyn FileSystem,
    real_dir: &Path,
    relative_dir: &Path,
    out: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in fs.read_dir(real_dir)? {
        let relative = relative_dir.join(&entry.name);
        if entry.is_dir {
            if entry.is_symlink {
                continue;
            }
            collect_files(fs, &real_dir.join(&entry.name), &relative, out)?;
        } else {
            out.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MemoryFileSystem, RealFileSystem};
    use tempfile::TempDir;

    fn tree() -> SourceTree {
        SourceTree::new("/o", "/u")
    }

    #[test]
    fn test_classifies_overlay_files() {
        let fs = MemoryFileSystem::new()
            .with_file("/o/pages/settings/index.ts")
            .with_file("/o/components/omni/OmniCard.tsx")
            .with_file("/u/pages/settings/index.ts")
            .with_file("/u/components/logo.tsx");

        let report = DriftReport::scan(&fs, &tree()).unwrap();

        assert_eq!(report.len(), 2);
        let relative: Vec<_> = report.entries().iter().map(|e| e.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("components/omni/OmniCard.tsx"),
                PathBuf::from("pages/settings/index.ts"),
            ]
        );

        let shadowing: Vec<_> = report.shadowing().collect();
        assert_eq!(shadowing.len(), 1);
        assert_eq!(
            shadowing[0].status,
            OverrideStatus::Shadows {
                upstream: PathBuf::from("/u/pages/settings/index.ts")
            }
        );
        assert_eq!(report.overlay_only().count(), 1);
    }

    #[test]
    fn test_missing_overlay_root() {
        let fs = MemoryFileSystem::new().with_file("/u/a.ts");
        let report = DriftReport::scan(&fs, &tree()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let fs = MemoryFileSystem::new()
            .with_file("/o/a.ts")
            .with_file("/u/a.ts")
            .with_file("/o/b.ts");
        let report = DriftReport::scan(&fs, &tree()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries[0]["status"], "shadows");
        assert_eq!(entries[0]["upstream"], "/u/a.ts");
        assert_eq!(entries[1]["status"], "overlay_only");
    }

    #[test]
    fn test_real_filesystem() {
        let temp = TempDir::new().unwrap();
        let overlay = temp.path().join("overlay");
        let upstream = temp.path().join("upstream");
        std::fs::create_dir_all(overlay.join("lib")).unwrap();
        std::fs::create_dir_all(upstream.join("lib")).unwrap();
        std::fs::write(overlay.join("lib/forge-api.ts"), b"// forge").unwrap();
        std::fs::write(upstream.join("lib/forge-api.ts"), b"// upstream").unwrap();

        let report = DriftReport::scan(&RealFileSystem, &SourceTree::new(&overlay, &upstream)).unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.entries()[0].status.is_shadowing());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let temp = TempDir::new().unwrap();
        let overlay = temp.path().join("overlay");
        let upstream = temp.path().join("upstream");
        std::fs::create_dir_all(&overlay).unwrap();
        std::fs::create_dir_all(&upstream).unwrap();
        std::fs::write(overlay.join("a.ts"), b"// forge").unwrap();
        std::os::unix::fs::symlink(".", overlay.join("self")).unwrap();
        std::os::unix::fs::symlink(".", overlay.join("again")).unwrap();

        let report = DriftReport::scan(&RealFileSystem, &SourceTree::new(&overlay, &upstream)).unwrap();

        let relative: Vec<_> = report.entries().iter().map(|e| e.relative.clone()).collect();
        assert_eq!(relative, vec![PathBuf::from("a.ts")]);
    }
}
