//! INI text codec.
//!
//! File format:
//! ```text
//! [SectionName]
//! key=value
//! key2=value2
//!
//! [OtherSection]
//! ...
//! ```
//!
//! - **`parser`** – [`parse`] turns text into a [`SectionMap`] (normal or
//!   reversed key role).
//! - **`writer`** – [`Document`] edits one key at a time while preserving every
//!   other line, which is what makes `save` a merge.

pub mod parser;
pub mod writer;

use std::path::Path;

pub use parser::{entries, parse, Entry, KeyRole, SectionMap};
pub use writer::Document;

use crate::error::ConfigError;
use crate::storage::{read_or_empty, FileStore};

/// Merges `(section, key, value)` triples into the file at `path`.
///
/// The file is read once, each triple is applied with [`Document::set`] and
/// the result is written back in one go; a missing file is treated as empty
/// and created.  Returns the number of triples written.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read or written.
pub fn write<'a, I>(store: &dyn FileStore, path: &Path, entries: I) -> Result<usize, ConfigError>
where
    I: IntoIterator<Item = (&'a str, &'a str, String)>,
{
    let text = read_or_empty(store, path).map_err(|e| ConfigError::io(path, e))?;
    let mut doc = Document::parse(&text);
    let mut written = 0;
    for (section, key, value) in entries {
        doc.set(section, key, &value);
        written += 1;
    }
    store
        .write(path, &doc.to_string())
        .map_err(|e| ConfigError::io(path, e))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MemoryFileStore;

    #[test]
    fn test_write_creates_missing_file() {
        // Arrange
        let store = MemoryFileStore::new();
        let path = Path::new("cfg/test");

        // Act
        let written = write(&store, path, [("Section1", "testInt", "3".to_string())]).expect("write");

        // Assert
        assert_eq!(written, 1);
        assert_eq!(store.contents(path).as_deref(), Some("[Section1]\ntestInt=3\n"));
    }

    #[test]
    fn test_write_preserves_unrelated_sections() {
        // Arrange
        let store = MemoryFileStore::new();
        let path = Path::new("cfg/test");
        store.insert(path, "[Keep]\nfoo = bar\n\n[Section1]\ntestInt=0\n");

        // Act
        write(
            &store,
            path,
            [
                ("Section1", "testInt", "7".to_string()),
                ("Section2", "color1", "1,2,3,4".to_string()),
            ],
        )
        .expect("write");

        // Assert
        assert_eq!(
            store.contents(path).as_deref(),
            Some("[Keep]\nfoo = bar\n\n[Section1]\ntestInt=7\n\n[Section2]\ncolor1=1,2,3,4\n")
        );
    }
}
