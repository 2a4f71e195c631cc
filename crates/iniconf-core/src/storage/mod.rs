//! Storage infrastructure: the file system collaborator.
//!
//! The registry and the key tables never touch `std::fs` directly.  They go
//! through the [`FileStore`] trait, which exposes exactly what they need:
//!
//! - path checks (`is_file`, `exists`),
//! - directory creation,
//! - whole-file read and write.
//!
//! [`StdFileStore`] is the production implementation; tests use
//! [`mock::MemoryFileStore`] to run load/save without a real disk.
//!
//! Writes are not atomic: `save` is a read-modify-write of the same path, so
//! concurrent saves to one file must be serialized by the caller.

use std::io;
use std::path::Path;

pub mod mock;

/// Trait abstracting the file system operations used by the registry.
pub trait FileStore: Send + Sync {
    /// Returns `true` if `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Reads the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replaces the whole file with `contents`, creating it if needed.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`FileStore`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileStore;

impl FileStore for StdFileStore {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Reads `path`, treating a missing file as empty text.
pub(crate) fn read_or_empty(store: &dyn FileStore, path: &Path) -> io::Result<String> {
    match store.read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_store_write_then_read_round_trip() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("test");
        let store = StdFileStore;

        // Act
        store
            .create_dir_all(path.parent().expect("parent"))
            .expect("create dir");
        store.write(&path, "[A]\nx=1\n").expect("write");

        // Assert
        assert!(store.is_file(&path));
        assert!(store.exists(&path));
        assert_eq!(store.read_to_string(&path).expect("read"), "[A]\nx=1\n");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!StdFileStore.is_file(dir.path()));
        assert!(StdFileStore.exists(dir.path()));
    }

    #[test]
    fn test_read_or_empty_treats_missing_file_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let text = read_or_empty(&StdFileStore, &dir.path().join("absent")).expect("read");
        assert!(text.is_empty());
    }
}
