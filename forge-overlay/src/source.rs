//! Source tree types for the overlay resolver.
//!
//! A [`SourceTree`] is the ordered pair of roots that alias specifiers are
//! searched in. The overlay root always comes first; the first root holding a
//! match wins.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which side of the overlay a root belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Downstream overrides. Probed first.
    Overlay,

    /// The upstream project being overridden.
    Upstream,
}

impl SourceKind {
    /// Check if this is the overlay side.
    pub fn is_overlay(&self) -> bool {
        matches!(self, SourceKind::Overlay)
    }

    /// Check if this is the upstream side.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SourceKind::Upstream)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Overlay => write!(f, "overlay"),
            SourceKind::Upstream => write!(f, "upstream"),
        }
    }
}

/// A single searchable root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRoot {
    /// Which side this root is.
    pub kind: SourceKind,

    /// Absolute directory path.
    pub path: PathBuf,
}

impl SourceRoot {
    /// Create a new root.
    pub fn new(kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// Get the root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.kind)
    }
}

/// The ordered (overlay, upstream) pair of roots.
///
/// # Example
///
/// ```
/// use forge_overlay::source::{SourceKind, SourceTree};
///
/// let tree = SourceTree::new("/forge-overrides/frontend/src", "/upstream/frontend/src");
///
/// let kinds: Vec<_> = tree.roots().map(|r| r.kind).collect();
/// assert_eq!(kinds, vec![SourceKind::Overlay, SourceKind::Upstream]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTree {
    overlay: SourceRoot,
    upstream: SourceRoot,
}

impl SourceTree {
    /// Create a tree from the overlay and upstream root directories.
    pub fn new(overlay: impl Into<PathBuf>, upstream: impl Into<PathBuf>) -> Self {
        Self {
            overlay: SourceRoot::new(SourceKind::Overlay, overlay),
            upstream: SourceRoot::new(SourceKind::Upstream, upstream),
        }
    }

    /// The overlay root.
    pub fn overlay(&self) -> &SourceRoot {
        &self.overlay
    }

    /// The upstream root.
    pub fn upstream(&self) -> &SourceRoot {
        &self.upstream
    }

    /// Roots in priority order: overlay, then upstream.
    pub fn roots(&self) -> impl Iterator<Item = &SourceRoot> {
        [&self.overlay, &self.upstream].into_iter()
    }

    /// Get the root of the given kind.
    pub fn root(&self, kind: SourceKind) -> &SourceRoot {
        match kind {
            SourceKind::Overlay => &self.overlay,
            SourceKind::Upstream => &self.upstream,
        }
    }

    /// Find which root contains `path`, if any. Overlay is checked first.
    pub fn owner_of(&self, path: &Path) -> Option<&SourceRoot> {
        self.roots().find(|root| path.starts_with(&root.path))
    }
}
