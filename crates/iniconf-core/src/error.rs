//! Error taxonomy shared by the registry, codec, key tables and command grammar.
//!
//! Recoverability is decided by the caller, not by the error type:
//!
//! - `NotFound` and `MalformedValue` are skipped (and logged) by batch
//!   operations such as `Registry::load` and keybind dispatch.
//! - `MalformedCommand` skips a single `|`-separated binding segment.
//! - `Io` / `NotARegularFile` fail a whole `load` call.
//! - `TypeMismatch`, `IndexOutOfRange` and `DuplicateDeclaration` indicate a
//!   schema or caller bug and are returned straight to the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::TypeTag;

/// Error type for every fallible operation in `iniconf-core`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No item is declared under `section.key`.
    #[error("no item declared as {section}.{key}")]
    NotFound { section: String, key: String },

    /// A typed access requested a different type than the one stored.
    #[error("type mismatch on {section}.{key}: requested {requested}, stored {stored}")]
    TypeMismatch {
        section: String,
        key: String,
        requested: TypeTag,
        stored: TypeTag,
    },

    /// A raw item index is past the end of the registry.
    #[error("item index {index} out of range (registry holds {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Text could not be converted to the item's declared type.
    #[error("malformed {tag} value {raw:?} for {section}.{key}: {reason}")]
    MalformedValue {
        section: String,
        key: String,
        tag: TypeTag,
        raw: String,
        reason: String,
    },

    /// A binding segment does not follow `OnPress:<section>.<field>=<value>`.
    #[error("malformed command {command:?}: {reason}")]
    MalformedCommand { command: String, reason: String },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target path exists but is not a regular file, or does not exist.
    #[error("{path} is not a regular file")]
    NotARegularFile { path: PathBuf },

    /// The same section/key was declared twice with a conflicting shape.
    #[error("conflicting declaration of {section}.{key}: already declared as {existing}, requested {requested}")]
    DuplicateDeclaration {
        section: String,
        key: String,
        existing: TypeTag,
        requested: TypeTag,
    },
}

impl ConfigError {
    /// Returns `true` for the whole-call file failures (`Io`, `NotARegularFile`).
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::NotARegularFile { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
