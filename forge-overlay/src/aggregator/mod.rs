//! Virtual schema catalog module.
//!
//! The [`VirtualAggregator`] owns one reserved specifier. When the host asks
//! to resolve it, [`VirtualAggregator::claim`] answers with an internal id;
//! when the host loads that id, [`VirtualAggregator::materialize`] scans the
//! schema directory and returns generated module source. Nothing is cached:
//! every load rescans, so adding or removing a schema during a watch session
//! shows up on the next load.
//!
//! ```text
//! import schemas from "virtual:executor-schemas";
//!                │
//!                ▼  claim()
//!     "\0virtual:executor-schemas"
//!                │
//!                ▼  materialize()
//!   scan shared/schemas/*.json ──► SchemaCatalog ──► generate_module()
//! ```

mod catalog;
mod codegen;

use std::sync::Arc;

use thiserror::Error;

use crate::config::SchemaConfig;
use crate::fs::{FileSystem, RealFileSystem};

pub use catalog::{CatalogEntry, CatalogError, CatalogResult, SchemaCatalog};
pub use codegen::generate_module;

/// Errors that can occur while materializing the virtual module.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Asked to load an id this aggregator does not own.
    #[error("Unknown virtual module id '{0}'")]
    UnknownVirtualId(String),

    /// The catalog could not be built.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Serves the schema catalog as a virtual module.
#[derive(Clone)]
pub struct VirtualAggregator {
    config: SchemaConfig,
    internal_id: String,
    fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for VirtualAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualAggregator")
            .field("config", &self.config)
            .field("internal_id", &self.internal_id)
            .finish_non_exhaustive()
    }
}

impl VirtualAggregator {
    /// Create an aggregator over the real filesystem.
    pub fn new(config: SchemaConfig) -> Self {
        Self::with_fs(config, Arc::new(RealFileSystem))
    }

    /// Create an aggregator over the given filesystem.
    pub fn with_fs(config: SchemaConfig, fs: Arc<dyn FileSystem>) -> Self {
        let internal_id = config.internal_id();
        Self {
            config,
            internal_id,
            fs,
        }
    }

    /// The reserved virtual specifier.
    pub fn virtual_id(&self) -> &str {
        &self.config.virtual_id
    }

    /// The internal id returned by [`claim`](Self::claim).
    pub fn internal_id(&self) -> &str {
        &self.internal_id
    }

    /// Claim `specifier` if it is the reserved virtual name.
    pub fn claim(&self, specifier: &str) -> Option<&str> {
        (specifier == self.config.virtual_id).then_some(self.internal_id.as_str())
    }

    /// Whether `id` is this aggregator's internal id.
    pub fn owns(&self, id: &str) -> bool {
        id == self.internal_id
    }

    /// Scan the schema directory.
    pub fn catalog(&self) -> CatalogResult<SchemaCatalog> {
        SchemaCatalog::scan(self.fs.as_ref(), &self.config)
    }

    /// Generate the module source for the internal id.
    pub fn materialize(&self, id: &str) -> Result<String, AggregatorError> {
        if !self.owns(id) {
            return Err(AggregatorError::UnknownVirtualId(id.to_string()));
        }
        let catalog = self.catalog()?;
        Ok(generate_module(&catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    const SCHEMAS: &str = "/repo/shared/schemas";

    fn aggregator(fs: MemoryFileSystem) -> VirtualAggregator {
        VirtualAggregator::with_fs(SchemaConfig::new(SCHEMAS), Arc::new(fs))
    }

    #[test]
    fn test_claim_only_reserved_name() {
        let agg = aggregator(MemoryFileSystem::new());

        assert_eq!(
            agg.claim("virtual:executor-schemas"),
            Some("\0virtual:executor-schemas")
        );
        assert_eq!(agg.claim("virtual:other"), None);
        assert_eq!(agg.claim("@/virtual:executor-schemas"), None);
        assert_eq!(agg.claim("\0virtual:executor-schemas"), None);
    }

    #[test]
    fn test_materialize_exports_file_keys() {
        let fs = MemoryFileSystem::new()
            .with_file(format!("{}/a.json", SCHEMAS))
            .with_file(format!("{}/b.json", SCHEMAS));
        let agg = aggregator(fs);

        let code = agg.materialize(agg.internal_id()).unwrap();
        assert!(code.contains("\"A\": __schema_0"));
        assert!(code.contains("\"B\": __schema_1"));
        assert!(code.contains("export const schemas"));
        assert!(code.contains("export default schemas;"));
    }

    #[test]
    fn test_materialize_empty_and_missing_directory_match() {
        let empty = aggregator(MemoryFileSystem::new().with_dir(SCHEMAS));
        let missing = aggregator(MemoryFileSystem::new());

        let from_empty = empty.materialize(empty.internal_id()).unwrap();
        let from_missing = missing.materialize(missing.internal_id()).unwrap();
        assert_eq!(from_empty, from_missing);
        assert!(from_empty.contains("export const schemas = {};"));
    }

    #[test]
    fn test_materialize_unknown_id() {
        let agg = aggregator(MemoryFileSystem::new());
        let err = agg.materialize("virtual:executor-schemas").unwrap_err();
        assert!(matches!(err, AggregatorError::UnknownVirtualId(_)));
    }

    #[test]
    fn test_materialize_reports_collisions() {
        let fs = MemoryFileSystem::new()
            .with_file(format!("{}/amp.json", SCHEMAS))
            .with_file(format!("{}/Amp.json", SCHEMAS));
        let agg = aggregator(fs);

        let err = agg.materialize(agg.internal_id()).unwrap_err();
        assert!(matches!(
            err,
            AggregatorError::Catalog(CatalogError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_custom_virtual_id() {
        let config = SchemaConfig::new(SCHEMAS).with_virtual_id("virtual:schemas");
        let agg = VirtualAggregator::with_fs(config, Arc::new(MemoryFileSystem::new()));

        assert_eq!(agg.virtual_id(), "virtual:schemas");
        assert_eq!(agg.claim("virtual:schemas"), Some("\0virtual:schemas"));
        assert!(agg.owns("\0virtual:schemas"));
    }
}
