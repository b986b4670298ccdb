//! Forge Overlay - layered source trees for frontend builds
//!
//! This library lets a downstream project replace individual files of an
//! upstream project without forking it. Module specifiers carrying an alias
//! prefix are resolved against the overlay tree first and the upstream tree
//! second. A second hook serves a virtual module that aggregates every schema
//! file in a directory into one keyed mapping.
//!
//! # Components
//!
//! - [`resolver::OverlayResolver`]: alias specifier search across both trees
//! - [`aggregator::VirtualAggregator`]: the generated schema catalog module
//! - [`workspace::WorkspaceResolution`]: re-anchors bare imports at the project root
//! - [`plugin::PluginChain`]: ordered hook dispatch with host fallback
//! - [`audit::DriftReport`]: which overrides still shadow an upstream file
//!
//! # Example
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use forge_overlay::config::ForgeConfig;
//! use forge_overlay::fs::MemoryFileSystem;
//! use forge_overlay::plugin::{HostResolver, PluginChain, ResolvedId};
//!
//! struct Host;
//! impl HostResolver for Host {
//!     fn resolve(&self, _specifier: &str, _importer: Option<&Path>) -> Option<PathBuf> {
//!         None
//!     }
//! }
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file("/repo/upstream/frontend/src/components/logo.tsx")
//!     .with_file("/repo/shared/schemas/amp.json");
//! let config = ForgeConfig::for_project("/repo/frontend");
//! let chain = PluginChain::forge(&config, Arc::new(fs), Arc::new(Host));
//!
//! let logo = chain.resolve_id("@/components/logo", None).unwrap();
//! assert_eq!(
//!     logo,
//!     Some(ResolvedId::File("/repo/upstream/frontend/src/components/logo.tsx".into())),
//! );
//!
//! let schemas = chain.resolve_id("virtual:executor-schemas", None).unwrap().unwrap();
//! let code = chain.load(&schemas.id()).unwrap().unwrap();
//! assert!(code.contains(r#""AMP": __schema_0"#));
//! ```

pub mod aggregator;
pub mod audit;
pub mod config;
pub mod fs;
pub mod logging;
pub mod plugin;
pub mod resolver;
pub mod source;
pub mod specifier;
pub mod workspace;

/// Crate version, for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use aggregator::{SchemaCatalog, VirtualAggregator};
pub use config::ForgeConfig;
pub use plugin::{HostResolver, Plugin, PluginChain, ResolvedId};
pub use resolver::{OverlayResolver, Resolution};
pub use source::{SourceKind, SourceTree};
