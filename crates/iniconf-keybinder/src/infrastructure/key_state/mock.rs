//! Scripted key-state source for tests.
//!
//! Tests press and release keys between poller ticks; the poller sees the
//! scripted state on its next sample.  Every query is counted so tests can
//! assert that a gated tick sampled nothing but the hotkey.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use iniconf_core::KeyCode;

use super::KeyStateOracle;

/// A mock implementation of [`KeyStateOracle`] driven by the test.
#[derive(Debug, Default)]
pub struct ScriptedKeyState {
    down: Mutex<HashSet<KeyCode>>,
    queries: AtomicUsize,
}

impl ScriptedKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `code` as held.
    pub fn press(&self, code: KeyCode) {
        self.down.lock().expect("lock poisoned").insert(code);
    }

    /// Marks `code` as released.
    pub fn release(&self, code: KeyCode) {
        self.down.lock().expect("lock poisoned").remove(&code);
    }

    /// Number of `is_key_down` calls so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl KeyStateOracle for ScriptedKeyState {
    fn is_key_down(&self, code: KeyCode) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.down.lock().expect("lock poisoned").contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_change_reported_state() {
        // Arrange
        let keys = ScriptedKeyState::new();

        // Act / Assert
        assert!(!keys.is_key_down(0x70));
        keys.press(0x70);
        assert!(keys.is_key_down(0x70));
        keys.release(0x70);
        assert!(!keys.is_key_down(0x70));
        assert_eq!(keys.query_count(), 3);
    }
}
