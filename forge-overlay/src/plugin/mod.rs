//! Hook-set surface for the host build tool.
//!
//! The host drives module resolution through a [`PluginChain`]: every
//! specifier goes to the registered plugins in order, and whatever none of
//! them claims falls through to the host's own [`HostResolver`]. Loading works
//! the same way; ids no plugin serves are read from disk by the host.
//!
//! # Registration Order
//!
//! Plugins run sorted by [`Enforce`] (`Pre`, then `Normal`, then `Post`),
//! keeping registration order within each group. The standard set from
//! [`forge_plugins`] registers as
//!
//! | Plugin | Enforce | Handles |
//! |---|---|---|
//! | `executor-schemas` | Normal | the virtual schema catalog |
//! | `forge-overlay-resolver` | Pre | alias specifiers (`@/...`) |
//! | `force-workspace-resolution` | Pre | bare package imports |
//! | `shared-alias` | Normal | the shared-types package |
//!
//! so the effective order is overlay, workspace, schemas, shared: the overlay
//! resolver always runs before anything generic.

mod chain;
mod hooks;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::aggregator::{AggregatorError, VirtualAggregator};
use crate::config::ForgeConfig;
use crate::fs::FileSystem;
use crate::resolver::OverlayResolver;
use crate::workspace::{SharedAlias, WorkspaceResolution};

pub use chain::{PluginChain, ResolveContext};

/// Result type for plugin hooks.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors a hook can report to the host.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The virtual schema module could not be generated.
    #[error(transparent)]
    Aggregator(#[from] AggregatorError),

    /// A hook failed for another reason.
    ///
    /// The built-in hooks never return this; it is for host-side plugins
    /// implementing [`Plugin`] that need to fail a resolve or load.
    #[error("Plugin '{plugin}' failed: {message}")]
    Hook { plugin: String, message: String },
}

/// Where a plugin sits relative to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Enforce {
    /// Before generic resolution.
    Pre,

    /// Registration order.
    #[default]
    Normal,

    /// After everything else.
    Post,
}

/// The answer to a resolve request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedId {
    /// A file on disk.
    File(PathBuf),

    /// An internal id served by a plugin's `load` hook.
    Virtual(String),
}

impl ResolvedId {
    /// The file path, for on-disk modules.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ResolvedId::File(path) => Some(path),
            ResolvedId::Virtual(_) => None,
        }
    }

    /// The id the host uses to load this module.
    pub fn id(&self) -> Cow<'_, str> {
        match self {
            ResolvedId::File(path) => path.to_string_lossy(),
            ResolvedId::Virtual(id) => Cow::Borrowed(id),
        }
    }

    /// Check if this is a virtual module.
    pub fn is_virtual(&self) -> bool {
        matches!(self, ResolvedId::Virtual(_))
    }
}

/// The host build tool's default resolution.
///
/// Called for every specifier no plugin claims, and by plugins that
/// re-enter resolution with a different importer.
pub trait HostResolver: Send + Sync {
    /// Resolve `specifier` as if imported from `importer`.
    fn resolve(&self, specifier: &str, importer: Option<&Path>) -> Option<PathBuf>;
}

/// A named set of resolution and load hooks.
///
/// Hooks receive no mutable state and may be called concurrently.
pub trait Plugin: Send + Sync {
    /// Unique plugin name.
    fn name(&self) -> &str;

    /// Ordering group.
    fn enforce(&self) -> Enforce {
        Enforce::Normal
    }

    /// Resolve a specifier, or `None` to let the next plugin try.
    fn resolve_id(
        &self,
        _specifier: &str,
        _importer: Option<&Path>,
        _ctx: &ResolveContext<'_>,
    ) -> PluginResult<Option<ResolvedId>> {
        Ok(None)
    }

    /// Supply module source for a resolved id, or `None` to let the host read it.
    fn load(&self, _id: &str) -> PluginResult<Option<String>> {
        Ok(None)
    }
}

/// Build the standard hook-set, in registration order.
pub fn forge_plugins(config: &ForgeConfig, fs: Arc<dyn FileSystem>) -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(VirtualAggregator::with_fs(config.schemas.clone(), fs.clone())),
        Arc::new(OverlayResolver::with_fs(&config.overlay, fs)),
        Arc::new(WorkspaceResolution::new(
            &config.workspace,
            &config.overlay.alias_prefix,
        )),
        Arc::new(SharedAlias::new(&config.workspace)),
    ]
}
