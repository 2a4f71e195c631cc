//! In-memory file store for unit testing.
//!
//! Allows tests to run registry load/save and key-table loading without
//! touching the disk.  Files are plain strings keyed by path; directories are
//! tracked separately so `is_file` and `exists` behave like the real thing.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::FileStore;

/// A mock implementation of [`FileStore`] holding files in memory.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    /// When `true`, `create_dir_all` fails with `PermissionDenied`.
    pub deny_create_dir: bool,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `create_dir_all` always fails.
    pub fn denying_create_dir() -> Self {
        Self {
            deny_create_dir: true,
            ..Self::default()
        }
    }

    /// Seeds a file, as if it already existed on disk.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), contents.to_string());
    }

    /// Returns the current contents of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }
}

impl FileStore for MemoryFileStore {
    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().expect("lock poisoned").contains_key(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.dirs.lock().expect("lock poisoned").contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.deny_create_dir {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "directory creation denied",
            ));
        }
        let mut dirs = self.dirs.lock().expect("lock poisoned");
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.insert(path, contents);
        Ok(())
    }
}
