//! Schema catalog discovery.
//!
//! Turns a directory listing into ordered, uniquely keyed catalog entries.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::SchemaConfig;
use crate::fs::FileSystem;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while building a schema catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The schema directory exists but could not be listed.
    #[error("Failed to list schema directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two schema files map to the same key.
    #[error("Schema files '{first}' and '{second}' both map to key '{key}'")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

/// One schema file in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Upper-cased file stem, e.g. `CLAUDE_CODE` for `claude_code.json`.
    pub key: String,

    /// File name within the schema directory.
    pub file_name: String,

    /// Path written into the generated import statement.
    pub import_path: String,

    /// Absolute path of the file.
    pub path: PathBuf,
}

/// Ordered set of schema files with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCatalog {
    entries: Vec<CatalogEntry>,
}

impl SchemaCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the configured directory.
    ///
    /// A missing directory yields an empty catalog. Subdirectories and files
    /// without a data extension are skipped.
    pub fn scan(fs: &dyn FileSystem, config: &SchemaConfig) -> CatalogResult<Self> {
        if !fs.is_dir(&config.directory) {
            debug!(
                directory = %config.directory.display(),
                "Schema directory not found; using an empty catalog"
            );
            return Ok(Self::new());
        }

        let entries = fs
            .read_dir(&config.directory)
            .map_err(|source| CatalogError::ReadDir {
                path: config.directory.clone(),
                source,
            })?;

        let files = entries
            .into_iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.name_lossy());

        let catalog = Self::from_listing(files, config)?;
        debug!(
            directory = %config.directory.display(),
            schemas = catalog.len(),
            "Scanned schema directory"
        );
        Ok(catalog)
    }

    /// Build a catalog from plain file names, without touching the disk.
    ///
    /// Names are sorted so the result does not depend on listing order.
    ///
    /// # Example
    ///
    /// ```
    /// use forge_overlay::aggregator::SchemaCatalog;
    /// use forge_overlay::config::SchemaConfig;
    ///
    /// let config = SchemaConfig::new("/repo/shared/schemas");
    /// let catalog = SchemaCatalog::from_listing(
    ///     ["gemini.json", "amp.json", "README.md"].map(String::from),
    ///     &config,
    /// ).unwrap();
    ///
    /// let keys: Vec<_> = catalog.keys().collect();
    /// assert_eq!(keys, vec!["AMP", "GEMINI"]);
    /// ```
    pub fn from_listing<I>(names: I, config: &SchemaConfig) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();

        let mut seen: HashMap<String, String> = HashMap::new();
        let mut entries = Vec::new();

        for file_name in names {
            let Some(stem) = strip_data_extension(&file_name, &config.data_extensions) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }

            let key = stem.to_uppercase();
            if let Some(first) = seen.get(&key) {
                return Err(CatalogError::DuplicateKey {
                    key,
                    first: first.clone(),
                    second: file_name,
                });
            }
            seen.insert(key.clone(), file_name.clone());

            entries.push(CatalogEntry {
                import_path: import_path(&config.import_base, &file_name),
                path: config.directory.join(&file_name),
                key,
                file_name,
            });
        }

        Ok(Self { entries })
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no schemas.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strip the longest matching data extension, if any matches.
fn strip_data_extension<'a>(file_name: &'a str, extensions: &[String]) -> Option<&'a str> {
    extensions
        .iter()
        .filter_map(|ext| file_name.strip_suffix(ext.as_str()))
        .min_by_key(|stem| stem.len())
}

fn import_path(base: &str, file_name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("./{}", file_name)
    } else {
        format!("{}/{}", base, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn config() -> SchemaConfig {
        SchemaConfig::new("/repo/shared/schemas")
    }

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keys_are_uppercased_stems() {
        let catalog =
            SchemaCatalog::from_listing(listing(&["claude_code.json", "codex.json"]), &config())
                .unwrap();

        let entry = catalog.get("CLAUDE_CODE").unwrap();
        assert_eq!(entry.file_name, "claude_code.json");
        assert_eq!(entry.import_path, "shared/schemas/claude_code.json");
        assert_eq!(entry.path, PathBuf::from("/repo/shared/schemas/claude_code.json"));
        assert!(catalog.get("CODEX").is_some());
    }

    #[test]
    fn test_non_data_files_skipped() {
        let catalog = SchemaCatalog::from_listing(
            listing(&["a.json", "notes.md", "b.json.bak", ".json"]),
            &config(),
        )
        .unwrap();

        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_order_is_sorted_by_file_name() {
        let catalog =
            SchemaCatalog::from_listing(listing(&["zeta.json", "alpha.json", "mid.json"]), &config())
                .unwrap();

        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["ALPHA", "MID", "ZETA"]);
    }

    #[test]
    fn test_duplicate_keys_fail() {
        let err = SchemaCatalog::from_listing(listing(&["amp.json", "AMP.json"]), &config())
            .unwrap_err();

        match err {
            CatalogError::DuplicateKey { key, first, second } => {
                assert_eq!(key, "AMP");
                assert_eq!(first, "AMP.json");
                assert_eq!(second, "amp.json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_across_extensions_fail() {
        let config = config().with_data_extensions([".json", ".jsonc"]);
        let err = SchemaCatalog::from_listing(listing(&["a.json", "a.jsonc"]), &config)
            .unwrap_err();
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn test_longest_extension_is_stripped() {
        let config = config().with_data_extensions([".json", ".schema.json"]);
        let catalog =
            SchemaCatalog::from_listing(listing(&["cursor.schema.json"]), &config).unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["CURSOR"]);
    }

    #[test]
    fn test_empty_import_base() {
        let config = config().with_import_base("");
        let catalog = SchemaCatalog::from_listing(listing(&["a.json"]), &config).unwrap();
        assert_eq!(catalog.entries()[0].import_path, "./a.json");
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let fs = MemoryFileSystem::new();
        let catalog = SchemaCatalog::scan(&fs, &config()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_scan_skips_subdirectories() {
        let fs = MemoryFileSystem::new()
            .with_file("/repo/shared/schemas/b.json")
            .with_file("/repo/shared/schemas/a.json")
            .with_file("/repo/shared/schemas/nested.json/inner.json");

        let catalog = SchemaCatalog::scan(&fs, &config()).unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(
            catalog.entries()[0].path,
            PathBuf::from("/repo/shared/schemas/a.json")
        );
    }
}
