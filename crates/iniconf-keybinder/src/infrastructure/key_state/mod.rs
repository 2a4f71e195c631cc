//! Physical key-state infrastructure.
//!
//! The poller only ever asks one question: "is this virtual key down right
//! now?".  [`KeyStateOracle`] is that question as a trait.
//!
//! On Windows the answer comes from `GetAsyncKeyState` (see [`windows`]); the
//! poller samples it every tick rather than installing hooks, so no message
//! loop is needed.
//!
//! # Testability
//!
//! Unit tests either script key states with [`mock::ScriptedKeyState`] or set
//! per-call expectations on the generated `MockKeyStateOracle`.

use iniconf_core::{KeyBind, KeyCode};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(test)]
use mockall::automock;

/// Error type for key-state sources.
#[derive(Debug, thiserror::Error)]
pub enum KeyStateError {
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting the "is this key currently down" query.
#[cfg_attr(test, automock)]
pub trait KeyStateOracle: Send + Sync {
    /// Returns `true` while the key with virtual code `code` is held.
    fn is_key_down(&self, code: KeyCode) -> bool;
}

/// Key-state helpers on the registry's [`KeyBind`] value.
pub trait KeyBindExt {
    /// Returns `true` while the bound key is held.
    fn is_down(&self, oracle: &dyn KeyStateOracle) -> bool;
}

impl KeyBindExt for KeyBind {
    fn is_down(&self, oracle: &dyn KeyStateOracle) -> bool {
        oracle.is_key_down(self.code())
    }
}

/// Returns the key-state source of the current platform.
///
/// # Errors
///
/// Returns [`KeyStateError::UnsupportedPlatform`] on platforms without a
/// key-state API.
pub fn system_key_state() -> Result<Box<dyn KeyStateOracle>, KeyStateError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WindowsKeyState))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(KeyStateError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_keybind_is_down_queries_its_code() {
        // Arrange
        let mut oracle = MockKeyStateOracle::new();
        oracle
            .expect_is_key_down()
            .with(eq(0x04))
            .times(1)
            .return_const(true);
        let bind = KeyBind::new(0x04);

        // Act / Assert
        assert!(bind.is_down(&oracle));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_system_key_state_is_unsupported_off_windows() {
        let err = system_key_state().err().expect("unsupported");
        assert!(err.to_string().starts_with("platform not supported"));
    }
}
