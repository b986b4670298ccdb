//! Ordered plugin dispatch with host fallback.

use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use super::{HostResolver, Plugin, PluginResult, ResolvedId};
use crate::config::ForgeConfig;
use crate::fs::FileSystem;

/// Plugins in effective order plus the host's default resolver.
pub struct PluginChain {
    plugins: Vec<Arc<dyn Plugin>>,
    host: Arc<dyn HostResolver>,
}

impl std::fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.plugin_names())
            .finish_non_exhaustive()
    }
}

impl PluginChain {
    /// Create an empty chain that falls through to `host`.
    pub fn new(host: Arc<dyn HostResolver>) -> Self {
        Self {
            plugins: Vec::new(),
            host,
        }
    }

    /// Create a chain with the standard hook-set registered.
    pub fn forge(config: &ForgeConfig, fs: Arc<dyn FileSystem>, host: Arc<dyn HostResolver>) -> Self {
        let mut chain = Self::new(host);
        for plugin in super::forge_plugins(config, fs) {
            chain.register_arc(plugin);
        }
        chain
    }

    /// Register a plugin.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> &mut Self {
        self.register_arc(Arc::new(plugin))
    }

    /// Register a shared plugin.
    ///
    /// It is placed after every plugin with the same or an earlier
    /// [`Enforce`](super::Enforce) group.
    pub fn register_arc(&mut self, plugin: Arc<dyn Plugin>) -> &mut Self {
        let enforce = plugin.enforce();
        let position = self
            .plugins
            .iter()
            .position(|p| p.enforce() > enforce)
            .unwrap_or(self.plugins.len());
        self.plugins.insert(position, plugin);
        self
    }

    /// Plugin names in effective order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Resolve `specifier` imported from `importer`.
    pub fn resolve_id(&self, specifier: &str, importer: Option<&Path>) -> PluginResult<Option<ResolvedId>> {
        self.resolve_skipping(specifier, importer, &[])
    }

    /// Load the source for `id`, or `None` if the host should read it from disk.
    pub fn load(&self, id: &str) -> PluginResult<Option<String>> {
        for plugin in &self.plugins {
            if let Some(code) = plugin.load(id)? {
                trace!(plugin = plugin.name(), id, "Plugin supplied module source");
                return Ok(Some(code));
            }
        }
        Ok(None)
    }

    fn resolve_skipping(
        &self,
        specifier: &str,
        importer: Option<&Path>,
        skip: &[&str],
    ) -> PluginResult<Option<ResolvedId>> {
        for plugin in &self.plugins {
            let name = plugin.name();
            if skip.contains(&name) {
                continue;
            }
            let ctx = ResolveContext {
                chain: self,
                current: name,
                skip,
            };
            if let Some(resolved) = plugin.resolve_id(specifier, importer, &ctx)? {
                trace!(plugin = name, specifier, id = %resolved.id(), "Plugin resolved specifier");
                return Ok(Some(resolved));
            }
        }
        Ok(self.host.resolve(specifier, importer).map(ResolvedId::File))
    }
}

/// Handle passed to a plugin's `resolve_id` hook.
pub struct ResolveContext<'a> {
    chain: &'a PluginChain,
    current: &'a str,
    skip: &'a [&'a str],
}

impl ResolveContext<'_> {
    /// Name of the plugin being called.
    pub fn plugin_name(&self) -> &str {
        self.current
    }

    /// Resolve through the rest of the chain, excluding the calling plugin,
    /// ending at the host's default resolver.
    pub fn resolve_skipping_self(
        &self,
        specifier: &str,
        importer: Option<&Path>,
    ) -> PluginResult<Option<ResolvedId>> {
        let mut skip: Vec<&str> = self.skip.to_vec();
        skip.push(self.current);
        self.chain.resolve_skipping(specifier, importer, &skip)
    }
}
