//! Application layer use cases for the keybinder.
//!
//! These modules depend on the registry from `iniconf_core` and on the
//! [`KeyStateOracle`](crate::infrastructure::key_state::KeyStateOracle)
//! trait only; they make no OS calls of their own.
//!
//! # Sub-modules
//!
//! - **`keybinds`** – Loads the keybind file into a [`keybinds::KeybindTable`]:
//!   the gating hotkey plus a command string per key name.
//!
//! - **`dispatch`** – Parses a binding's `|`-separated commands and writes the
//!   matching ones into the registry.
//!
//! - **`poll`** – The per-tick press/release state machine and its
//!   cancellable background thread.
//!
//! - **`recorder`** – Captures the next pressed key into a `KeyBind` item.

pub mod dispatch;
pub mod keybinds;
pub mod poll;
pub mod recorder;
