//! KeybindTable: which key runs which commands, and which key gates them.
//!
//! Built once from the keybind file and immutable afterwards:
//!
//! ```text
//! [KeyBinder]
//! HotKey=Alt Key
//!
//! [KeyBinds]
//! OnPress:Section1.testBool=true|OnRelease:Section1.testBool=false=F1
//! ```
//!
//! `[KeyBinder]` is read in the normal key role.  `[KeyBinds]` is read in the
//! reversed role: the command text sits left of the last `=`, the key name
//! right of it.  Every key name, including the hotkey's, must exist in the
//! [`KeyData`] directory.

use std::collections::BTreeMap;
use std::path::Path;

use iniconf_core::codec::{parse, KeyRole};
use iniconf_core::storage::FileStore;
use iniconf_core::{parse_command, split_binding, ActionType, ConfigError, KeyCode, KeyData};
use tracing::{debug, info, warn};

pub const KEYBINDER_SECTION: &str = "KeyBinder";
pub const HOTKEY_KEY: &str = "HotKey";
pub const KEYBINDS_SECTION: &str = "KeyBinds";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    code: KeyCode,
    command: String,
}

/// Loaded key bindings plus the optional gating hotkey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeybindTable {
    hotkey: Option<KeyCode>,
    bindings: BTreeMap<String, Binding>,
}

impl KeybindTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the keybind file at `path`, resolving names through `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotARegularFile`] if `path` is not an existing
    /// regular file and [`ConfigError::Io`] if it cannot be read.  Unknown key
    /// names are not errors: they are logged and dropped.
    pub fn load(store: &dyn FileStore, path: &Path, keys: &KeyData) -> Result<Self, ConfigError> {
        if !store.is_file(path) {
            return Err(ConfigError::NotARegularFile {
                path: path.to_path_buf(),
            });
        }
        let text = store
            .read_to_string(path)
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        let table = Self::from_text(&text, keys);
        info!(
            path = %path.display(),
            bindings = table.len(),
            hotkey = ?table.hotkey,
            "keybinds loaded"
        );
        Ok(table)
    }

    /// Builds the table from keybind-file text.
    pub fn from_text(text: &str, keys: &KeyData) -> Self {
        let mut table = Self::new();

        let settings = parse(text, KeyRole::Normal);
        if let Some(name) = settings
            .get(KEYBINDER_SECTION)
            .and_then(|section| section.get(HOTKEY_KEY))
        {
            match keys.code_of(name) {
                Some(code) => table.hotkey = Some(code),
                None => warn!("invalid hotkey {name:?}: not a known key name, polling stays ungated"),
            }
        }

        let reversed = parse(text, KeyRole::Reversed);
        for (key_name, command) in reversed.get(KEYBINDS_SECTION).into_iter().flatten() {
            let Some(code) = keys.code_of(key_name) else {
                warn!("invalid key {key_name:?} specified for bind, dropping it");
                continue;
            };
            if command.is_empty() {
                debug!(key = %key_name, "dropping empty bind");
                continue;
            }
            for segment in split_binding(command) {
                if let Err(e) = parse_command(segment) {
                    warn!(key = %key_name, "bind segment will be skipped: {e}");
                }
            }
            table.insert(key_name, code, command);
        }

        table
    }

    /// Adds or replaces the binding of `key_name`.
    pub fn insert(&mut self, key_name: &str, code: KeyCode, command: &str) {
        self.bindings.insert(
            key_name.to_string(),
            Binding {
                code,
                command: command.to_string(),
            },
        );
    }

    pub fn set_hotkey(&mut self, hotkey: Option<KeyCode>) {
        self.hotkey = hotkey;
    }

    /// The gating hotkey, `None` when unset or unresolved.
    pub fn hotkey(&self) -> Option<KeyCode> {
        self.hotkey
    }

    /// Raw command string bound to `key_name`, empty when there is none.
    pub fn get_bind(&self, key_name: &str) -> &str {
        self.bindings
            .get(key_name)
            .map_or("", |binding| binding.command.as_str())
    }

    /// Payload (`section.field=value`) of the first well-formed `action`
    /// command bound to `key_name`.
    pub fn action_for_bind(&self, key_name: &str, action: ActionType) -> Option<String> {
        split_binding(self.get_bind(key_name))
            .filter_map(|segment| parse_command(segment).ok())
            .find(|command| command.action == action)
            .map(|command| command.payload())
    }

    /// `(key name, key code, command string)` for every binding, by name.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, KeyCode, &str)> {
        self.bindings
            .iter()
            .map(|(name, binding)| (name.as_str(), binding.code, binding.command.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
