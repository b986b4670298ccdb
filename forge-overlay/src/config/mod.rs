//! Configuration for the overlay hooks.
//!
//! All values are resolved once when the hooks are built and never change
//! afterwards. [`ForgeConfig::for_project`] derives the standard layout from
//! the frontend directory; [`ConfigFile`] overlays values from an INI file.
//!
//! ```text
//! repo/
//! ├── frontend/              # project dir (anchor: frontend/package.json)
//! ├── forge-overrides/frontend/src   # overlay root
//! ├── upstream/frontend/src          # upstream root
//! └── shared/
//!     └── schemas/           # schema catalog directory
//! ```

mod error;
mod file;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};
pub use file::ConfigFile;

/// Default alias prefix routed through the overlay resolver.
pub const DEFAULT_ALIAS_PREFIX: &str = "@/";

/// Default probe extensions. The bare form is always probed first.
pub const DEFAULT_EXTENSIONS: &[&str] = &["", ".ts", ".tsx", ".js", ".jsx"];

/// Default directory index file names.
pub const DEFAULT_INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "index.js", "index.jsx"];

/// Default reserved virtual specifier for the schema catalog.
pub const DEFAULT_VIRTUAL_ID: &str = "virtual:executor-schemas";

/// Default import base used in generated schema imports.
pub const DEFAULT_IMPORT_BASE: &str = "shared/schemas";

/// Default data-file extensions picked up by the schema catalog.
pub const DEFAULT_DATA_EXTENSIONS: &[&str] = &[".json"];

/// Default name of the shared-types package.
pub const DEFAULT_SHARED_PACKAGE: &str = "shared";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Overlay resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Root of the downstream override tree.
    pub overlay_root: PathBuf,

    /// Root of the upstream tree.
    pub upstream_root: PathBuf,

    /// Specifier prefix that routes through the resolver.
    pub alias_prefix: String,

    /// Ordered extensions appended to the relative path. `""` is the bare form.
    pub extensions: Vec<String>,

    /// Ordered index file names probed inside a directory.
    pub index_files: Vec<String>,
}

impl OverlayConfig {
    /// Create a config for the given roots with default probe lists.
    pub fn new(overlay_root: impl Into<PathBuf>, upstream_root: impl Into<PathBuf>) -> Self {
        Self {
            overlay_root: overlay_root.into(),
            upstream_root: upstream_root.into(),
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            extensions: owned(DEFAULT_EXTENSIONS),
            index_files: owned(DEFAULT_INDEX_FILES),
        }
    }

    /// Set the alias prefix.
    pub fn with_alias_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alias_prefix = prefix.into();
        self
    }

    /// Set the probe extensions. The bare form is prepended if missing.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = with_bare_first(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Set the index file names.
    pub fn with_index_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Check the probe lists are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.alias_prefix.is_empty() {
            return Err(ConfigError::invalid("overlay.alias_prefix", "must not be empty"));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| !e.is_empty() && !e.starts_with('.'))
        {
            return Err(ConfigError::invalid(
                "overlay.extensions",
                format!("'{}' must start with '.'", ext),
            ));
        }
        if let Some(name) = self
            .index_files
            .iter()
            .find(|f| f.is_empty() || f.contains('/'))
        {
            return Err(ConfigError::invalid(
                "overlay.index_files",
                format!("'{}' must be a plain file name", name),
            ));
        }
        Ok(())
    }
}

/// Keep `""` as the first extension, exactly once.
fn with_bare_first(extensions: Vec<String>) -> Vec<String> {
    let mut out = vec![String::new()];
    out.extend(extensions.into_iter().filter(|e| !e.is_empty()));
    out
}

/// Virtual schema catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Reserved virtual specifier.
    pub virtual_id: String,

    /// Directory scanned for schema files.
    pub directory: PathBuf,

    /// Prefix for generated import paths (`<import_base>/<file>`).
    pub import_base: String,

    /// File extensions that count as schema files.
    pub data_extensions: Vec<String>,
}

impl SchemaConfig {
    /// Create a config scanning `directory` with default names.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            virtual_id: DEFAULT_VIRTUAL_ID.to_string(),
            directory: directory.into(),
            import_base: DEFAULT_IMPORT_BASE.to_string(),
            data_extensions: owned(DEFAULT_DATA_EXTENSIONS),
        }
    }

    /// Set the reserved virtual specifier.
    pub fn with_virtual_id(mut self, id: impl Into<String>) -> Self {
        self.virtual_id = id.into();
        self
    }

    /// Set the import base.
    pub fn with_import_base(mut self, base: impl Into<String>) -> Self {
        self.import_base = base.into();
        self
    }

    /// Set the data-file extensions.
    pub fn with_data_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// The internal id handed back to the host for the virtual specifier.
    pub fn internal_id(&self) -> String {
        format!("{}{}", crate::specifier::INTERNAL_ID_PREFIX, self.virtual_id)
    }

    /// Check the names are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.virtual_id.is_empty() {
            return Err(ConfigError::invalid("schemas.virtual_id", "must not be empty"));
        }
        if self.data_extensions.is_empty() {
            return Err(ConfigError::invalid("schemas.extensions", "must not be empty"));
        }
        if let Some(ext) = self.data_extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(ConfigError::invalid(
                "schemas.extensions",
                format!("'{}' must be '.' followed by at least one character", ext),
            ));
        }
        Ok(())
    }
}

/// Bare-specifier re-anchoring and the shared package alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// File bare imports are resolved from (the project's root manifest).
    pub anchor_file: PathBuf,

    /// Name of the shared-types package; never re-anchored.
    pub shared_package: String,

    /// Directory the shared package name maps to.
    pub shared_root: PathBuf,
}

impl WorkspaceConfig {
    /// Create a config anchored at `anchor_file`.
    pub fn new(anchor_file: impl Into<PathBuf>, shared_root: impl Into<PathBuf>) -> Self {
        Self {
            anchor_file: anchor_file.into(),
            shared_package: DEFAULT_SHARED_PACKAGE.to_string(),
            shared_root: shared_root.into(),
        }
    }

    /// Set the shared package name.
    pub fn with_shared_package(mut self, name: impl Into<String>) -> Self {
        self.shared_package = name.into();
        self
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,

    /// Optional log file; stderr only when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Set the filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Also write logs to `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

/// Complete configuration for the standard hook-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeConfig {
    /// Overlay resolver settings.
    pub overlay: OverlayConfig,

    /// Virtual schema catalog settings.
    pub schemas: SchemaConfig,

    /// Bare-specifier and shared alias settings.
    pub workspace: WorkspaceConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl ForgeConfig {
    /// Derive the standard layout from the frontend project directory.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use forge_overlay::config::ForgeConfig;
    ///
    /// let config = ForgeConfig::for_project("/repo/frontend");
    /// assert_eq!(config.overlay.overlay_root, Path::new("/repo/forge-overrides/frontend/src"));
    /// assert_eq!(config.overlay.upstream_root, Path::new("/repo/upstream/frontend/src"));
    /// assert_eq!(config.schemas.directory, Path::new("/repo/shared/schemas"));
    /// assert_eq!(config.workspace.anchor_file, Path::new("/repo/frontend/package.json"));
    /// ```
    pub fn for_project(project_dir: impl AsRef<Path>) -> Self {
        let project_dir = project_dir.as_ref();
        let repo_root = project_dir.parent().unwrap_or(project_dir);
        let shared_root = repo_root.join("shared");

        Self {
            overlay: OverlayConfig::new(
                repo_root.join("forge-overrides").join("frontend").join("src"),
                repo_root.join("upstream").join("frontend").join("src"),
            ),
            schemas: SchemaConfig::new(shared_root.join("schemas")),
            workspace: WorkspaceConfig::new(project_dir.join("package.json"), shared_root),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.overlay.validate()?;
        self.schemas.validate()?;
        Ok(())
    }
}
