//! Plugin hook implementations for the layer's components.

use std::path::Path;

use tracing::debug;

use super::{Enforce, Plugin, PluginResult, ResolveContext, ResolvedId};
use crate::aggregator::VirtualAggregator;
use crate::resolver::OverlayResolver;
use crate::workspace::{SharedAlias, WorkspaceResolution};

impl Plugin for OverlayResolver {
    fn name(&self) -> &str {
        "forge-overlay-resolver"
    }

    fn enforce(&self) -> Enforce {
        Enforce::Pre
    }

    fn resolve_id(
        &self,
        specifier: &str,
        _importer: Option<&Path>,
        _ctx: &ResolveContext<'_>,
    ) -> PluginResult<Option<ResolvedId>> {
        Ok(self.resolve(specifier).map(ResolvedId::File))
    }
}

impl Plugin for VirtualAggregator {
    fn name(&self) -> &str {
        "executor-schemas"
    }

    fn resolve_id(
        &self,
        specifier: &str,
        _importer: Option<&Path>,
        _ctx: &ResolveContext<'_>,
    ) -> PluginResult<Option<ResolvedId>> {
        Ok(self
            .claim(specifier)
            .map(|id| ResolvedId::Virtual(id.to_string())))
    }

    fn load(&self, id: &str) -> PluginResult<Option<String>> {
        if !self.owns(id) {
            return Ok(None);
        }
        Ok(Some(self.materialize(id)?))
    }
}

impl Plugin for WorkspaceResolution {
    fn name(&self) -> &str {
        "force-workspace-resolution"
    }

    fn enforce(&self) -> Enforce {
        Enforce::Pre
    }

    fn resolve_id(
        &self,
        specifier: &str,
        importer: Option<&Path>,
        ctx: &ResolveContext<'_>,
    ) -> PluginResult<Option<ResolvedId>> {
        if !self.applies_to(specifier) {
            return Ok(None);
        }
        debug!(
            specifier,
            importer = ?importer,
            anchor = %self.anchor().display(),
            "Re-anchoring bare import at workspace root"
        );
        ctx.resolve_skipping_self(specifier, Some(self.anchor()))
    }
}

impl Plugin for SharedAlias {
    fn name(&self) -> &str {
        "shared-alias"
    }

    fn resolve_id(
        &self,
        specifier: &str,
        importer: Option<&Path>,
        ctx: &ResolveContext<'_>,
    ) -> PluginResult<Option<ResolvedId>> {
        let Some(target) = self.rewrite(specifier) else {
            return Ok(None);
        };
        ctx.resolve_skipping_self(&target.to_string_lossy(), importer)
    }
}
