//! INI configuration file support.
//!
//! ```ini
//! [overlay]
//! overlay_root = ../forge-overrides/frontend/src
//! upstream_root = ../upstream/frontend/src
//! alias_prefix = @/
//! extensions = .ts, .tsx, .js, .jsx
//! index_files = index.ts, index.tsx, index.js, index.jsx
//!
//! [schemas]
//! virtual_id = virtual:executor-schemas
//! directory = ../shared/schemas
//! import_base = shared/schemas
//! extensions = .json
//!
//! [workspace]
//! anchor = package.json
//! shared_package = shared
//! shared_root = ../shared
//!
//! [logging]
//! filter = info
//! file = forge-overlay.log
//! ```
//!
//! Relative paths are resolved against the directory holding the file. Keys
//! that are absent keep their defaults. The bare extension is always probed
//! first and is not listed.

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use super::{ConfigError, ConfigResult, ForgeConfig};

const OVERLAY: &str = "overlay";
const SCHEMAS: &str = "schemas";
const WORKSPACE: &str = "workspace";
const LOGGING: &str = "logging";

/// A configuration file on disk and the configuration it produced.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    config: ForgeConfig,
}

impl ConfigFile {
    /// Load `path`, with defaults derived from the directory holding it.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let defaults = ForgeConfig::for_project(base_dir(&path));
        Self::load_with_defaults(path, defaults)
    }

    /// Load `path` on top of explicit defaults.
    pub fn load_with_defaults(path: impl Into<PathBuf>, defaults: ForgeConfig) -> ConfigResult<Self> {
        let path = path.into();
        let ini = Ini::load_from_file(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = apply(&ini, base_dir(&path), defaults)?;
        Ok(Self { path, config })
    }

    /// Parse INI text, resolving relative paths against `base_dir`.
    pub fn parse(contents: &str, base_dir: &Path, defaults: ForgeConfig) -> ConfigResult<ForgeConfig> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Read {
            path: base_dir.to_path_buf(),
            source: ini::Error::Parse(e),
        })?;
        apply(&ini, base_dir, defaults)
    }

    /// Wrap an in-memory configuration that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>, config: ForgeConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Consume the file, keeping the configuration.
    pub fn into_config(self) -> ForgeConfig {
        self.config
    }

    /// Write the configuration back to disk.
    pub fn save(&self) -> ConfigResult<()> {
        to_ini(&self.config)
            .write_to_file(&self.path)
            .map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn apply(ini: &Ini, base: &Path, mut config: ForgeConfig) -> ConfigResult<ForgeConfig> {
    if let Some(section) = ini.section(Some(OVERLAY)) {
        let overlay = &mut config.overlay;
        if let Some(v) = section.get("overlay_root") {
            overlay.overlay_root = resolve_path(base, v);
        }
        if let Some(v) = section.get("upstream_root") {
            overlay.upstream_root = resolve_path(base, v);
        }
        if let Some(v) = section.get("alias_prefix") {
            overlay.alias_prefix = v.trim().to_string();
        }
        if let Some(v) = section.get("extensions") {
            *overlay = overlay.clone().with_extensions(split_list(v));
        }
        if let Some(v) = section.get("index_files") {
            overlay.index_files = split_list(v);
        }
    }

    if let Some(section) = ini.section(Some(SCHEMAS)) {
        let schemas = &mut config.schemas;
        if let Some(v) = section.get("virtual_id") {
            schemas.virtual_id = v.trim().to_string();
        }
        if let Some(v) = section.get("directory") {
            schemas.directory = resolve_path(base, v);
        }
        if let Some(v) = section.get("import_base") {
            schemas.import_base = v.trim().to_string();
        }
        if let Some(v) = section.get("extensions") {
            schemas.data_extensions = split_list(v);
        }
    }

    if let Some(section) = ini.section(Some(WORKSPACE)) {
        let workspace = &mut config.workspace;
        if let Some(v) = section.get("anchor") {
            workspace.anchor_file = resolve_path(base, v);
        }
        if let Some(v) = section.get("shared_package") {
            workspace.shared_package = v.trim().to_string();
        }
        if let Some(v) = section.get("shared_root") {
            workspace.shared_root = resolve_path(base, v);
        }
    }

    if let Some(section) = ini.section(Some(LOGGING)) {
        apply_logging(section, base, &mut config);
    }

    config.validate()?;
    Ok(config)
}

fn apply_logging(section: &Properties, base: &Path, config: &mut ForgeConfig) {
    if let Some(v) = section.get("filter") {
        config.logging.filter = v.trim().to_string();
    }
    if let Some(v) = section.get("file") {
        let v = v.trim();
        config.logging.file = if v.is_empty() {
            None
        } else {
            Some(resolve_path(base, v))
        };
    }
}

fn to_ini(config: &ForgeConfig) -> Ini {
    let mut ini = Ini::new();

    let extensions: Vec<&str> = config
        .overlay
        .extensions
        .iter()
        .map(String::as_str)
        .filter(|e| !e.is_empty())
        .collect();

    ini.with_section(Some(OVERLAY))
        .set("overlay_root", display(&config.overlay.overlay_root))
        .set("upstream_root", display(&config.overlay.upstream_root))
        .set("alias_prefix", config.overlay.alias_prefix.as_str())
        .set("extensions", extensions.join(", "))
        .set("index_files", config.overlay.index_files.join(", "));

    ini.with_section(Some(SCHEMAS))
        .set("virtual_id", config.schemas.virtual_id.as_str())
        .set("directory", display(&config.schemas.directory))
        .set("import_base", config.schemas.import_base.as_str())
        .set("extensions", config.schemas.data_extensions.join(", "));

    ini.with_section(Some(WORKSPACE))
        .set("anchor", display(&config.workspace.anchor_file))
        .set("shared_package", config.workspace.shared_package.as_str())
        .set("shared_root", display(&config.workspace.shared_root));

    ini.with_section(Some(LOGGING))
        .set("filter", config.logging.filter.as_str())
        .set(
            "file",
            config.logging.file.as_deref().map(display).unwrap_or_default(),
        );

    ini
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn resolve_path(base: &Path, value: &str) -> PathBuf {
    let value = Path::new(value.trim());
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        base.join(value)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn defaults() -> ForgeConfig {
        ForgeConfig::for_project("/repo/frontend")
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = ConfigFile::parse("", Path::new("/repo/frontend"), defaults()).unwrap();
        assert_eq!(config, defaults());
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let text = "[overlay]\noverlay_root = ../overrides/src\nupstream_root = /abs/upstream/src\n";
        let config = ConfigFile::parse(text, Path::new("/repo/frontend"), defaults()).unwrap();

        assert_eq!(
            config.overlay.overlay_root,
            PathBuf::from("/repo/frontend/../overrides/src")
        );
        assert_eq!(config.overlay.upstream_root, PathBuf::from("/abs/upstream/src"));
    }

    #[test]
    fn test_lists_are_comma_separated() {
        let text = "[overlay]\nextensions = .vue, .ts\nindex_files = index.vue,index.ts\n\n[schemas]\nextensions = .json, .jsonc\n";
        let config = ConfigFile::parse(text, Path::new("/repo/frontend"), defaults()).unwrap();

        assert_eq!(config.overlay.extensions, vec!["", ".vue", ".ts"]);
        assert_eq!(config.overlay.index_files, vec!["index.vue", "index.ts"]);
        assert_eq!(config.schemas.data_extensions, vec![".json", ".jsonc"]);
    }

    #[test]
    fn test_workspace_and_logging_sections() {
        let text = "[workspace]\nanchor = package.json\nshared_package = @forge/shared\n\n[logging]\nfilter = debug\nfile = logs/forge.log\n";
        let config = ConfigFile::parse(text, Path::new("/p"), defaults()).unwrap();

        assert_eq!(config.workspace.anchor_file, PathBuf::from("/p/package.json"));
        assert_eq!(config.workspace.shared_package, "@forge/shared");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/p/logs/forge.log")));
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let text = "[theme]\ncolor = orange\n";
        assert!(ConfigFile::parse(text, Path::new("/p"), defaults()).is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let text = "[overlay]\nalias_prefix =\n";
        let err = ConfigFile::parse(text, Path::new("/p"), defaults()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = ConfigFile::load(temp.path().join("missing.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_save_then_load_preserves_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("forge-overlay.ini");

        let mut config = ForgeConfig::for_project(temp.path());
        config.overlay.alias_prefix = "~/".to_string();
        config.logging.file = Some(temp.path().join("forge.log"));
        ConfigFile::new(&path, config.clone()).save().unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.path(), path.as_path());
        assert_eq!(loaded.into_config(), config);
    }
}
