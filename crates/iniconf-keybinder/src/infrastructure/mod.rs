//! Infrastructure layer for the keybinder.
//!
//! Contains OS-facing adapters: the physical key-state source and the TOML
//! settings file of the binary.
//!
//! **Dependency rule**: this layer may depend on `iniconf_core`, but MUST NOT
//! be imported by the `application` layer except through the
//! [`key_state::KeyStateOracle`] trait.

pub mod key_state;
pub mod settings;
