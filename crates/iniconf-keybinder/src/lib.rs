//! iniconf-keybinder library.
//!
//! The binary in `main.rs` and the integration tests in `tests/` both build
//! on this module tree: `application` holds the keybind table, dispatch,
//! poller and key recorder; `infrastructure` holds the key-state sources and
//! the settings file.

pub mod application;
pub mod infrastructure;
