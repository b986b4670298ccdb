//! Workspace-rooted resolution of bare imports and the shared package alias.
//!
//! Files from the upstream tree are compiled as if they lived in the overlay
//! project, but on disk they sit next to upstream's own (possibly missing)
//! dependency set. [`WorkspaceResolution`] re-anchors every bare import at the
//! project's root manifest so all files share the single installed
//! dependency set. It never probes the filesystem itself; the rest of the
//! chain and the host do the actual resolution.

use std::path::{Path, PathBuf};

use crate::config::WorkspaceConfig;
use crate::specifier::{classify, is_package_or_subpath};

/// Re-anchors bare package imports at the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceResolution {
    anchor_file: PathBuf,
    alias_prefix: String,
    shared_package: String,
}

impl WorkspaceResolution {
    /// Create the hook from workspace settings and the overlay alias prefix.
    pub fn new(config: &WorkspaceConfig, alias_prefix: &str) -> Self {
        Self {
            anchor_file: config.anchor_file.clone(),
            alias_prefix: alias_prefix.to_string(),
            shared_package: config.shared_package.clone(),
        }
    }

    /// The file bare imports are resolved from.
    pub fn anchor(&self) -> &Path {
        &self.anchor_file
    }

    /// Whether `specifier` is a bare import this hook re-anchors.
    ///
    /// Relative, absolute, alias-prefixed, internal and shared-package
    /// specifiers are left alone.
    ///
    /// # Example
    ///
    /// ```
    /// use forge_overlay::config::WorkspaceConfig;
    /// use forge_overlay::workspace::WorkspaceResolution;
    ///
    /// let hook = WorkspaceResolution::new(
    ///     &WorkspaceConfig::new("/repo/frontend/package.json", "/repo/shared"),
    ///     "@/",
    /// );
    /// assert!(hook.applies_to("lodash"));
    /// assert!(hook.applies_to("@radix-ui/react-dialog"));
    /// assert!(!hook.applies_to("@/components/logo"));
    /// assert!(!hook.applies_to("./logo"));
    /// assert!(!hook.applies_to("shared/types"));
    /// ```
    pub fn applies_to(&self, specifier: &str) -> bool {
        classify(specifier, &self.alias_prefix, &self.shared_package).is_bare()
    }
}

/// Maps the shared-types package name onto its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedAlias {
    package: String,
    root: PathBuf,
}

impl SharedAlias {
    /// Create the alias from workspace settings.
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            package: config.shared_package.clone(),
            root: config.shared_root.clone(),
        }
    }

    /// Rewrite `shared` or `shared/<path>` to a path under the shared root.
    pub fn rewrite(&self, specifier: &str) -> Option<PathBuf> {
        if !is_package_or_subpath(specifier, &self.package) {
            return None;
        }
        let rest = specifier[self.package.len()..].trim_start_matches('/');
        if rest.is_empty() {
            Some(self.root.clone())
        } else {
            Some(self.root.join(rest))
        }
    }
}
