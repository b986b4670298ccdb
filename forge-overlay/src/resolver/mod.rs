//! Overlay resolution of alias specifiers.
//!
//! The [`OverlayResolver`] strips the alias prefix from a specifier and
//! searches the overlay root, then the upstream root, for a matching file or
//! directory index. The first hit wins, giving the precedence
//!
//! ```text
//! overlay file > overlay index > upstream file > upstream index
//! ```
//!
//! A miss is not an error: it is logged and reported as `None` so the host can
//! try its own resolution. Nothing is cached; every call probes the
//! filesystem again, so results stay correct across a long watch session.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use std::sync::Arc;
//! use forge_overlay::config::OverlayConfig;
//! use forge_overlay::fs::MemoryFileSystem;
//! use forge_overlay::resolver::OverlayResolver;
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file("/upstream/src/components/logo.tsx")
//!     .with_file("/upstream/src/pages/settings/index.ts")
//!     .with_file("/overrides/src/pages/settings/index.ts");
//!
//! let resolver = OverlayResolver::with_fs(
//!     &OverlayConfig::new("/overrides/src", "/upstream/src"),
//!     Arc::new(fs),
//! );
//!
//! assert_eq!(
//!     resolver.resolve("@/components/logo").as_deref(),
//!     Some(Path::new("/upstream/src/components/logo.tsx")),
//! );
//! assert_eq!(
//!     resolver.resolve("@/pages/settings").as_deref(),
//!     Some(Path::new("/overrides/src/pages/settings/index.ts")),
//! );
//! assert_eq!(resolver.resolve("lodash"), None);
//! ```

mod probe;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::OverlayConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::source::{SourceKind, SourceTree};
use crate::specifier::stays_within_root;

pub use probe::{Candidate, MatchKind, ProbeSet};

/// A successful overlay resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Absolute path of the matched file.
    pub path: PathBuf,

    /// Which root the file came from.
    pub source: SourceKind,

    /// Whether it matched directly or as a directory index.
    pub matched: MatchKind,

    /// The specifier with the alias prefix removed.
    pub relative: String,
}

/// A candidate annotated with the root it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootedCandidate {
    /// Root the candidate is under.
    pub source: SourceKind,

    /// The candidate itself.
    pub candidate: Candidate,
}

/// Resolves alias specifiers against an overlay and an upstream tree.
#[derive(Clone)]
pub struct OverlayResolver {
    tree: SourceTree,
    alias_prefix: String,
    probes: ProbeSet,
    fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for OverlayResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayResolver")
            .field("tree", &self.tree)
            .field("alias_prefix", &self.alias_prefix)
            .field("probes", &self.probes)
            .finish_non_exhaustive()
    }
}

impl OverlayResolver {
    /// Create a resolver over the real filesystem.
    pub fn new(config: &OverlayConfig) -> Self {
        Self::with_fs(config, Arc::new(RealFileSystem))
    }

    /// Create a resolver over the given filesystem.
    pub fn with_fs(config: &OverlayConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            tree: SourceTree::new(&config.overlay_root, &config.upstream_root),
            alias_prefix: config.alias_prefix.clone(),
            probes: ProbeSet::from_config(config),
            fs,
        }
    }

    /// The searched roots.
    pub fn tree(&self) -> &SourceTree {
        &self.tree
    }

    /// The alias prefix this resolver claims.
    pub fn alias_prefix(&self) -> &str {
        &self.alias_prefix
    }

    /// The probe lists.
    pub fn probes(&self) -> &ProbeSet {
        &self.probes
    }

    /// Strip the alias prefix, or `None` if the specifier does not carry it.
    pub fn strip_alias<'a>(&self, specifier: &'a str) -> Option<&'a str> {
        specifier.strip_prefix(self.alias_prefix.as_str())
    }

    /// Resolve `specifier` to a file path.
    ///
    /// Returns `None` for specifiers without the alias prefix and for alias
    /// specifiers with no match in either tree.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        self.resolve_detailed(specifier).map(|r| r.path)
    }

    /// Resolve `specifier`, reporting where the match came from.
    pub fn resolve_detailed(&self, specifier: &str) -> Option<Resolution> {
        let relative = self.strip_alias(specifier)?;

        if !stays_within_root(relative) {
            warn!(specifier, "Alias specifier escapes the source roots; not resolving");
            return None;
        }

        let found = self.search(relative);
        match &found {
            Some(resolution) => debug!(
                specifier,
                source = %resolution.source,
                matched = %resolution.matched,
                path = %resolution.path.display(),
                "Resolved alias specifier"
            ),
            None => warn!(
                specifier,
                overlay = %self.tree.overlay().path().display(),
                upstream = %self.tree.upstream().path().display(),
                "Could not resolve {}",
                specifier
            ),
        }
        found
    }

    /// Every path that would be probed for `specifier`, in order.
    ///
    /// Empty when the specifier does not carry the alias prefix.
    pub fn candidates(&self, specifier: &str) -> Vec<RootedCandidate> {
        let Some(relative) = self.strip_alias(specifier) else {
            return Vec::new();
        };
        self.tree
            .roots()
            .flat_map(|root| {
                self.probes
                    .candidates(root.path(), relative)
                    .into_iter()
                    .map(move |candidate| RootedCandidate {
                        source: root.kind,
                        candidate,
                    })
            })
            .collect()
    }

    /// Search both roots for a relative path that already had its prefix removed.
    fn search(&self, relative: &str) -> Option<Resolution> {
        for root in self.tree.roots() {
            for candidate in self.probes.candidates(root.path(), relative) {
                if self.fs.is_file(&candidate.path) {
                    return Some(Resolution {
                        path: candidate.path,
                        source: root.kind,
                        matched: candidate.kind,
                        relative: relative.to_string(),
                    });
                }
            }
        }
        None
    }
}
