//! Key capture for `KeyBind` items.
//!
//! A UI arms the recorder for one registry item; on the next poll the first
//! key found down (scanning codes 1..=255) becomes that item's value and the
//! recorder disarms itself.

use std::sync::{Mutex, MutexGuard, PoisonError};

use iniconf_core::{ConfigError, KeyBind, KeyCode, Registry};
use tracing::{debug, info};

use crate::infrastructure::key_state::KeyStateOracle;

/// Highest virtual key code scanned while recording.
const MAX_KEY_CODE: KeyCode = 255;

/// Captures the next pressed key into a `KeyBind` item.
#[derive(Debug, Default)]
pub struct KeyRecorder {
    target: Mutex<Option<usize>>,
}

impl KeyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the recorder for the `KeyBind` item at `index`.
    pub fn start(&self, index: usize) {
        *self.lock() = Some(index);
        debug!(index, "key recording armed");
    }

    pub fn cancel(&self) {
        *self.lock() = None;
    }

    pub fn is_recording(&self) -> bool {
        self.lock().is_some()
    }

    /// Stores the first held key into the armed item, if any key is held.
    ///
    /// Returns the recorded code, or `None` when not armed or nothing is down.
    ///
    /// # Errors
    ///
    /// Returns the registry error if the armed index is out of range or not
    /// a `KeyBind` item; the recorder is disarmed in that case too.
    pub fn poll(
        &self,
        oracle: &dyn KeyStateOracle,
        registry: &mut Registry,
    ) -> Result<Option<KeyCode>, ConfigError> {
        let mut target = self.lock();
        let Some(index) = *target else {
            return Ok(None);
        };
        let Some(code) = (1..=MAX_KEY_CODE).find(|&code| oracle.is_key_down(code)) else {
            return Ok(None);
        };

        *target = None;
        registry.update::<KeyBind, _>(index, |bind| bind.set(code))?;
        info!(index, key = %KeyBind::new(code), "key recorded");
        Ok(Some(code))
    }

    fn lock(&self) -> MutexGuard<'_, Option<usize>> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
