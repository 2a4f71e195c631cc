//! TOML settings for the keybinder binary.
//!
//! These are the binary's own knobs, separate from the INI files it manages:
//!
//! ```toml
//! config_dir = "somedir"
//! config_name = "test"
//! keybinds_file = "keybinds"
//! key_names_file = "UiAndKeyData"
//! tick_interval_ms = 10
//! log_level = "info"
//! ```
//!
//! Every field has a serde default, so a missing file or a partial file both
//! work.  `keybinds_file` and `key_names_file` are resolved relative to
//! `config_dir` unless they are absolute.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Keybinder settings stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Directory holding the config, keybind and key-name files.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
    /// Name of the registry config file inside `config_dir`.
    #[serde(default = "default_config_name")]
    pub config_name: String,
    /// Keybind file (`[KeyBinder]` + `[KeyBinds]`).
    #[serde(default = "default_keybinds_file")]
    pub keybinds_file: PathBuf,
    /// Key-name and menu label file (`[KeyNames]` + menu sections).
    #[serde(default = "default_key_names_file")]
    pub key_names_file: PathBuf,
    /// Delay between two poll ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_config_dir() -> PathBuf {
    PathBuf::from(iniconf_core::registry::DEFAULT_CONFIG_DIRECTORY)
}
fn default_config_name() -> String {
    "test".to_string()
}
fn default_keybinds_file() -> PathBuf {
    PathBuf::from("keybinds")
}
fn default_key_names_file() -> PathBuf {
    PathBuf::from("UiAndKeyData")
}
fn default_tick_interval_ms() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            config_name: default_config_name(),
            keybinds_file: default_keybinds_file(),
            key_names_file: default_key_names_file(),
            tick_interval_ms: default_tick_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn keybinds_path(&self) -> PathBuf {
        self.config_dir.join(&self.keybinds_file)
    }

    pub fn key_names_path(&self) -> PathBuf {
        self.config_dir.join(&self.key_names_file)
    }
}

/// Loads settings from `path`, returning `Settings::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
