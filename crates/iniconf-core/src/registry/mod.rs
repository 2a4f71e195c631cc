//! The typed configuration registry.
//!
//! A [`Registry`] owns an insertion-ordered list of [`ConfigItem`]s plus the
//! directory their config files live in.  Lifecycle:
//!
//! ```text
//! new → declare* → load → (get / set / update)* → save → drop
//! ```
//!
//! Items are addressed by the index returned from [`Registry::declare`] or
//! [`Registry::find`].  Every typed access checks the requested Rust type
//! against the item's declared [`TypeTag`] and fails with
//! [`ConfigError::TypeMismatch`] instead of reinterpreting the value.
//!
//! The registry is not internally synchronized.  When the poll loop runs on
//! its own thread, wrap the registry in a `Mutex` and take the lock around
//! `save` / `load` as well as dispatch.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::codec::{self, entries, KeyRole};
use crate::domain::{ConfigItem, ConfigValue, TypeTag, TypedValue};
use crate::error::ConfigError;
use crate::storage::{FileStore, StdFileStore};

/// Directory used for config files until [`Registry::set_config_directory`]
/// is called.
pub const DEFAULT_CONFIG_DIRECTORY: &str = "iniconf";

/// Outcome of a successful [`Registry::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Entries converted and stored into a declared item.
    pub applied: usize,
    /// Entries whose `section.key` matches no declared item.
    pub unknown: usize,
    /// Entries that matched an item but could not be converted.
    pub rejected: Vec<ConfigError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Outcome of a successful [`Registry::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub written: usize,
}

/// Collection of declared configuration items.
pub struct Registry {
    items: Vec<ConfigItem>,
    directory: PathBuf,
    store: Arc<dyn FileStore>,
}

impl Registry {
    /// Creates an empty registry backed by the real file system.
    pub fn new() -> Self {
        Self::with_store(Arc::new(StdFileStore))
    }

    /// Creates an empty registry backed by `store`.
    pub fn with_store(store: Arc<dyn FileStore>) -> Self {
        Self {
            items: Vec::new(),
            directory: PathBuf::from(DEFAULT_CONFIG_DIRECTORY),
            store,
        }
    }

    pub fn config_directory(&self) -> &Path {
        &self.directory
    }

    pub fn set_config_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
    }

    // ── Declaration ───────────────────────────────────────────────────────────

    /// Declares `section.name` with the given default and returns its index.
    ///
    /// Re-declaring an existing item with the same type and default returns
    /// the existing index without adding anything.  Defaults are compared by
    /// their stored text, so a `NaN` default matches itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateDeclaration`] if `section.name`
    /// (compared case-insensitively) is already declared with a different
    /// type or a different default, and [`ConfigError::MalformedValue`] if
    /// the default cannot be stored as a single INI line.
    pub fn declare<T: ConfigValue>(
        &mut self,
        name: &str,
        section: &str,
        default: T,
    ) -> Result<usize, ConfigError> {
        let default = default.into_value();

        if let Some(index) = self.position(section, name) {
            let existing = &self.items[index];
            if existing.type_tag() != T::TAG
                || existing.default_value().to_ini_string() != default.to_ini_string()
            {
                return Err(ConfigError::DuplicateDeclaration {
                    section: section.to_string(),
                    key: name.to_string(),
                    existing: existing.type_tag(),
                    requested: T::TAG,
                });
            }
            return Ok(index);
        }

        let item = ConfigItem::new(name, section, default);
        storable(&item, item.value())?;
        self.items.push(item);
        debug!(section, name, tag = %T::TAG, "declared config item");
        Ok(self.items.len() - 1)
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Returns the index of `section.key`, ignoring ASCII case on both parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no such item is declared.
    pub fn find(&self, section: &str, key: &str) -> Result<usize, ConfigError> {
        self.position(section, key).ok_or_else(|| ConfigError::NotFound {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in declaration order.
    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::IndexOutOfRange`] for an undeclared index.
    pub fn item(&self, index: usize) -> Result<&ConfigItem, ConfigError> {
        self.items.get(index).ok_or(ConfigError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut ConfigItem, ConfigError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ConfigError::IndexOutOfRange { index, len })
    }

    fn position(&self, section: &str, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.matches(section, key))
    }

    // ── Typed access ──────────────────────────────────────────────────────────

    /// Returns a copy of the value at `index`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IndexOutOfRange`] or [`ConfigError::TypeMismatch`].
    pub fn get<T: ConfigValue>(&self, index: usize) -> Result<T, ConfigError> {
        let item = self.item(index)?;
        T::from_value(item.value()).ok_or_else(|| mismatch::<T>(item))
    }

    /// Replaces the value at `index`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IndexOutOfRange`], [`ConfigError::TypeMismatch`], or
    /// [`ConfigError::MalformedValue`] for a string that cannot be stored on
    /// one INI line; on error the stored value is unchanged.
    pub fn set<T: ConfigValue>(&mut self, index: usize, value: T) -> Result<(), ConfigError> {
        let item = self.item_mut(index)?;
        if item.type_tag() != T::TAG {
            return Err(mismatch::<T>(item));
        }
        let value = value.into_value();
        storable(item, &value)?;
        item.replace(value);
        Ok(())
    }

    /// Mutates the value at `index` in place and returns the closure's result.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IndexOutOfRange`], [`ConfigError::TypeMismatch`], or
    /// [`ConfigError::MalformedValue`] when the closure leaves a value that
    /// cannot be stored; the previous value is restored in that case.
    pub fn update<T, R>(&mut self, index: usize, f: impl FnOnce(&mut T) -> R) -> Result<R, ConfigError>
    where
        T: ConfigValue,
    {
        let item = self.item_mut(index)?;
        if item.type_tag() != T::TAG {
            return Err(mismatch::<T>(item));
        }
        let previous = item.value().clone();
        let result = match T::from_value_mut(item.value_mut()) {
            Some(value) => f(value),
            None => return Err(mismatch::<T>(item)),
        };
        if let Err(e) = storable(item, item.value()) {
            item.replace(previous);
            return Err(e);
        }
        Ok(result)
    }

    /// Parses `raw` with the item's declared type and stores the result.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IndexOutOfRange`], or [`ConfigError::MalformedValue`]
    /// when `raw` is not valid text for the item's type (the stored value is
    /// then unchanged).
    pub fn set_from_str(&mut self, index: usize, raw: &str) -> Result<(), ConfigError> {
        let item = self.item_mut(index)?;
        let tag = item.type_tag();
        let value = TypedValue::parse_as(tag, raw).map_err(|e| ConfigError::MalformedValue {
            section: item.section().to_string(),
            key: item.name().to_string(),
            tag,
            raw: raw.to_string(),
            reason: e.reason().to_string(),
        })?;
        storable(item, &value)?;
        item.replace(value);
        Ok(())
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Path of the config file `config_name` inside the config directory.
    pub fn config_path(&self, config_name: &str) -> PathBuf {
        self.directory.join(config_name)
    }

    /// Creates the config directory if needed and returns the file path.
    fn prepare_path(&self, config_name: &str) -> Result<PathBuf, ConfigError> {
        if !self.store.exists(&self.directory) {
            self.store
                .create_dir_all(&self.directory)
                .map_err(|e| ConfigError::io(&self.directory, e))?;
            debug!(directory = %self.directory.display(), "created config directory");
        }
        Ok(self.config_path(config_name))
    }

    /// Writes every item into `config_name`, merging with what is on disk.
    ///
    /// Sections and keys that are not declared in this registry are kept
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory cannot be created or the
    /// file cannot be read or written.
    pub fn save(&self, config_name: &str) -> Result<SaveReport, ConfigError> {
        let path = self.prepare_path(config_name)?;
        let written = codec::write(
            self.store.as_ref(),
            &path,
            self.items
                .iter()
                .map(|item| (item.section(), item.name(), item.value().to_ini_string())),
        )?;

        info!(path = %path.display(), items = written, "config saved");
        Ok(SaveReport { path, written })
    }

    /// Reads `config_name` and applies every entry that matches an item.
    ///
    /// Lines are resolved in file order, so when several lines name the same
    /// item (repeated headers, keys differing only in case) the last one wins.
    /// Unknown lines are counted and ignored.  Values that cannot be parsed as
    /// the item's type are logged, collected in [`LoadReport::rejected`] and
    /// skipped; the rest of the file still loads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotARegularFile`] if the file does not exist and
    /// [`ConfigError::Io`] if the directory cannot be created or the file
    /// cannot be read.  No item is modified in either case.
    pub fn load(&mut self, config_name: &str) -> Result<LoadReport, ConfigError> {
        let path = self.prepare_path(config_name)?;
        if !self.store.is_file(&path) {
            return Err(ConfigError::NotARegularFile { path });
        }
        let text = self
            .store
            .read_to_string(&path)
            .map_err(|e| ConfigError::io(&path, e))?;

        let mut report = LoadReport::default();
        let mut latest: Vec<Option<&str>> = vec![None; self.items.len()];
        for entry in entries(&text, KeyRole::Normal) {
            match self.position(entry.section, entry.key) {
                Some(index) => latest[index] = Some(entry.value),
                None => {
                    debug!(section = entry.section, key = entry.key, "ignoring undeclared entry");
                    report.unknown += 1;
                }
            }
        }

        for (index, raw) in latest.into_iter().enumerate() {
            let Some(raw) = raw else { continue };
            match self.set_from_str(index, raw) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    warn!("skipping entry: {e}");
                    report.rejected.push(e);
                }
            }
        }

        info!(
            path = %path.display(),
            applied = report.applied,
            unknown = report.unknown,
            rejected = report.rejected.len(),
            "config loaded"
        );
        Ok(report)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("directory", &self.directory)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

/// Fails with [`ConfigError::MalformedValue`] if `value` would not survive a
/// save and reload as a single `key=value` line.
fn storable(item: &ConfigItem, value: &TypedValue) -> Result<(), ConfigError> {
    value
        .check_storable()
        .map_err(|e| ConfigError::MalformedValue {
            section: item.section().to_string(),
            key: item.name().to_string(),
            tag: value.tag(),
            raw: value.to_ini_string(),
            reason: e.reason().to_string(),
        })
}

fn mismatch<T: ConfigValue>(item: &ConfigItem) -> ConfigError {
    ConfigError::TypeMismatch {
        section: item.section().to_string(),
        key: item.name().to_string(),
        requested: T::TAG,
        stored: item.type_tag(),
    }
}
