//! # iniconf-core
//!
//! Typed configuration registry persisted as INI text, plus the shared
//! building blocks of the keybinder:
//!
//! - **`codec`** – INI parsing (normal and reversed key role) and the
//!   merge-on-write document editor.
//! - **`domain`** – tagged configuration values and declared items.
//! - **`registry`** – [`Registry`]: declare, find, typed get/set, save, load.
//! - **`storage`** – the [`FileStore`] file system abstraction.
//! - **`keymap`** – key-name directory, menu label tables, Windows VK names.
//! - **`command`** – the `OnPress:` / `OnRelease:` binding grammar.
//! - **`error`** – [`ConfigError`].
//!
//! This crate has no OS-specific dependencies.

pub mod codec;
pub mod command;
pub mod domain;
pub mod error;
pub mod keymap;
pub mod registry;
pub mod storage;

pub use command::{parse_command, split_binding, ActionType, Command};
pub use domain::{Color, ConfigItem, ConfigValue, KeyBind, TypeTag, TypedValue};
pub use error::ConfigError;
pub use keymap::{KeyCode, KeyData};
pub use registry::{LoadReport, Registry, SaveReport};
pub use storage::{FileStore, StdFileStore};
