//! Key-name directory and menu label tables.
//!
//! [`KeyData`] is loaded once from a companion file and is read-only after
//! that.  It supplies the vocabulary of key names that bindings and the
//! hotkey may use, plus opaque per-section label tables for menus.
//!
//! The companion file is parsed with the reversed key role, so every line is
//! `<code>=<name>`:
//!
//! ```text
//! [KeyNames]
//! 112=F1
//! 4=Middle Mouse
//!
//! [AimMode]
//! 0=Off
//! 1=Hold
//! ```
//!
//! When no companion file exists, [`KeyData::windows_defaults`] builds the
//! directory from the built-in Windows VK name table.

pub mod windows_vk;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{parse, KeyRole};
use crate::error::ConfigError;
use crate::storage::FileStore;

/// A virtual key code as used by the key-state oracle.
pub type KeyCode = i32;

/// Section of the companion file that holds the key-name directory.
pub const KEY_NAMES_SECTION: &str = "KeyNames";

/// Key names plus menu label tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyData {
    key_names: BTreeMap<String, KeyCode>,
    menu_data: BTreeMap<String, BTreeMap<i32, String>>,
}

impl KeyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory built from the Windows VK name table, with no menu data.
    pub fn windows_defaults() -> Self {
        let key_names = windows_vk::named_keys()
            .map(|(code, name)| (name.to_string(), code))
            .collect();
        Self {
            key_names,
            menu_data: BTreeMap::new(),
        }
    }

    /// Loads the companion file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotARegularFile`] if `path` is not an existing
    /// regular file and [`ConfigError::Io`] if it cannot be read.
    pub fn load(store: &dyn FileStore, path: &Path) -> Result<Self, ConfigError> {
        if !store.is_file(path) {
            return Err(ConfigError::NotARegularFile {
                path: path.to_path_buf(),
            });
        }
        let text = store
            .read_to_string(path)
            .map_err(|e| ConfigError::io(path, e))?;
        Ok(Self::from_text(&text))
    }

    /// Builds the tables from companion-file text.
    ///
    /// Lines whose code is not an integer are logged and skipped.
    pub fn from_text(text: &str) -> Self {
        let mut data = Self::new();
        for (section, entries) in parse(text, KeyRole::Reversed) {
            for (label, raw_code) in entries {
                let Ok(code) = raw_code.parse::<i32>() else {
                    warn!("ignoring [{section}] entry {label:?}: code {raw_code:?} is not an integer");
                    continue;
                };
                if section == KEY_NAMES_SECTION {
                    data.key_names.insert(label, code);
                } else {
                    data.menu_data
                        .entry(section.clone())
                        .or_default()
                        .insert(code, label);
                }
            }
        }
        debug!(
            keys = data.key_names.len(),
            menus = data.menu_data.len(),
            "key data parsed"
        );
        data
    }

    /// Resolves a key name (exact match) to its code.
    pub fn code_of(&self, name: &str) -> Option<KeyCode> {
        self.key_names.get(name).copied()
    }

    pub fn key_names(&self) -> &BTreeMap<String, KeyCode> {
        &self.key_names
    }

    /// Label table of a menu section, keyed by code.
    pub fn menu(&self, section: &str) -> Option<&BTreeMap<i32, String>> {
        self.menu_data.get(section)
    }

    pub fn menu_label(&self, section: &str, code: i32) -> Option<&str> {
        self.menu(section)?.get(&code).map(String::as_str)
    }
}
