//! Filesystem access used by the resolution layer.
//!
//! Every probe goes through the [`FileSystem`] trait so the search logic can be
//! exercised against an in-memory tree. The layer only ever reads; nothing here
//! creates, moves or deletes files.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A directory entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name.
    pub name: OsString,

    /// Whether this entry is a directory (following symlinks).
    pub is_dir: bool,

    /// Whether the entry itself is a symbolic link.
    pub is_symlink: bool,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
            is_symlink: false,
        }
    }

    /// Mark the entry as a symbolic link.
    pub fn with_symlink(mut self, is_symlink: bool) -> Self {
        self.is_symlink = is_symlink;
        self
    }

    /// Entry name as UTF-8, replacing invalid sequences.
    pub fn name_lossy(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

/// Read-only view of a filesystem.
///
/// Implementations must be safe to share between threads: hosts may resolve
/// independent specifiers concurrently.
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// List the immediate entries of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// The real filesystem, via `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // file_type() does not follow symlinks; a linked directory still counts
            let is_dir = entry.path().is_dir();
            let is_symlink = entry.file_type()?.is_symlink();
            entries.push(DirEntry::new(entry.file_name(), is_dir).with_symlink(is_symlink));
        }
        Ok(entries)
    }
}

/// An in-memory tree of files.
///
/// Directories are implied by the files beneath them. Listings come back
/// sorted by name.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use forge_overlay::fs::{FileSystem, MemoryFileSystem};
///
/// let fs = MemoryFileSystem::new()
///     .with_file("/upstream/src/components/logo.tsx")
///     .with_file("/upstream/src/pages/settings/index.ts");
///
/// assert!(fs.is_file(Path::new("/upstream/src/components/logo.tsx")));
/// assert!(fs.is_dir(Path::new("/upstream/src/pages")));
/// assert!(!fs.is_file(Path::new("/upstream/src/pages")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (and its ancestor directories).
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.add_file(path);
        self
    }

    /// Add an empty directory (and its ancestors).
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path);
        self
    }

    /// Add a file (and its ancestor directories).
    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path);
    }

    /// Add an empty directory (and its ancestors).
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let mut current = normalize(path.as_ref());
        loop {
            if !self.dirs.insert(current.clone()) {
                break;
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }
    }

    /// Number of files in the tree.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(&normalize(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let dir = normalize(path);
        if !self.dirs.contains(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }

        let child_of = |p: &&PathBuf| p.parent() == Some(dir.as_path());
        let mut entries: Vec<DirEntry> = self
            .dirs
            .iter()
            .filter(child_of)
            .filter_map(|p| p.file_name().map(|n| DirEntry::new(n, true)))
            .chain(
                self.files
                    .iter()
                    .filter(child_of)
                    .filter_map(|p| p.file_name().map(|n| DirEntry::new(n, false))),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Lexically normalize a path: drops `.` components and trailing separators.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
