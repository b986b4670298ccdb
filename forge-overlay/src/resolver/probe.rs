//! Candidate path generation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;

/// How a candidate path was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The relative path plus one of the extensions.
    File,

    /// A directory index file inside the relative path.
    Index,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::File => write!(f, "file"),
            MatchKind::Index => write!(f, "index"),
        }
    }
}

/// One path to probe within a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full path to check.
    pub path: PathBuf,

    /// Whether this is a direct file or a directory index.
    pub kind: MatchKind,
}

/// Ordered extension and index lists.
///
/// For a relative path `P` under root `R` the probe order is `R/P+e` for each
/// extension `e`, then `R/P/i` for each index file `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSet {
    extensions: Vec<String>,
    index_files: Vec<String>,
}

impl ProbeSet {
    /// Create a probe set from explicit lists.
    pub fn new(extensions: Vec<String>, index_files: Vec<String>) -> Self {
        Self {
            extensions,
            index_files,
        }
    }

    /// Build the probe set from resolver configuration.
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.extensions.clone(), config.index_files.clone())
    }

    /// Extensions in probe order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Index file names in probe order.
    pub fn index_files(&self) -> &[String] {
        &self.index_files
    }

    /// All candidates for `relative` under `root`, in probe order.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use forge_overlay::resolver::{MatchKind, ProbeSet};
    ///
    /// let probes = ProbeSet::new(
    ///     vec!["".into(), ".ts".into()],
    ///     vec!["index.ts".into()],
    /// );
    /// let paths: Vec<_> = probes
    ///     .candidates(Path::new("/src"), "pages/settings")
    ///     .into_iter()
    ///     .map(|c| (c.path, c.kind))
    ///     .collect();
    ///
    /// assert_eq!(paths, vec![
    ///     (Path::new("/src/pages/settings").to_path_buf(), MatchKind::File),
    ///     (Path::new("/src/pages/settings.ts").to_path_buf(), MatchKind::File),
    ///     (Path::new("/src/pages/settings/index.ts").to_path_buf(), MatchKind::Index),
    /// ]);
    /// ```
    pub fn candidates(&self, root: &Path, relative: &str) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(self.extensions.len() + self.index_files.len());

        // An empty relative path names the root itself, which is never a file
        if !relative.is_empty() {
            for ext in &self.extensions {
                out.push(Candidate {
                    path: root.join(format!("{}{}", relative, ext)),
                    kind: MatchKind::File,
                });
            }
        }

        let dir = root.join(relative);
        for index in &self.index_files {
            out.push(Candidate {
                path: dir.join(index),
                kind: MatchKind::Index,
            });
        }

        out
    }
}

impl Default for ProbeSet {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::new("", ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_order() {
        let probes = ProbeSet::default();
        let paths: Vec<PathBuf> = probes
            .candidates(Path::new("/src"), "components/logo")
            .into_iter()
            .map(|c| c.path)
            .collect();

        let expected: Vec<PathBuf> = [
            "/src/components/logo",
            "/src/components/logo.ts",
            "/src/components/logo.tsx",
            "/src/components/logo.js",
            "/src/components/logo.jsx",
            "/src/components/logo/index.ts",
            "/src/components/logo/index.tsx",
            "/src/components/logo/index.js",
            "/src/components/logo/index.jsx",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        assert_eq!(paths, expected);
    }

    #[test]
    fn test_files_precede_indexes() {
        let candidates = ProbeSet::default().candidates(Path::new("/src"), "lib");
        let first_index = candidates
            .iter()
            .position(|c| c.kind == MatchKind::Index)
            .unwrap();
        assert!(candidates[..first_index]
            .iter()
            .all(|c| c.kind == MatchKind::File));
        assert!(candidates[first_index..]
            .iter()
            .all(|c| c.kind == MatchKind::Index));
    }

    #[test]
    fn test_empty_relative_only_probes_root_index() {
        let candidates = ProbeSet::default().candidates(Path::new("/src"), "");
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].path, PathBuf::from("/src/index.ts"));
    }

    #[test]
    fn test_trailing_slash_still_finds_index() {
        let candidates = ProbeSet::default().candidates(Path::new("/src"), "pages/settings/");
        assert!(candidates
            .iter()
            .any(|c| c.path == Path::new("/src/pages/settings/index.ts")));
    }

    #[test]
    fn test_match_kind_display() {
        assert_eq!(MatchKind::File.to_string(), "file");
        assert_eq!(MatchKind::Index.to_string(), "index");
    }
}
