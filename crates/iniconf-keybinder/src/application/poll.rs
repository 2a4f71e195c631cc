//! KeyPoller: turns sampled key states into OnPress / OnRelease dispatches.
//!
//! # State machine
//!
//! Each bound key is `Up` or `Down`; a key never seen before counts as `Up`.
//! On every tick, for every binding:
//!
//! ```text
//! now Down, before Up   → execute_bind(key, OnPress)
//! now Up,   before Down → execute_bind(key, OnRelease)
//! otherwise             → nothing
//! ```
//!
//! and the sampled state is stored unconditionally.
//!
//! # Hotkey gating
//!
//! With a hotkey configured, a tick only scans bindings while the hotkey is
//! held; a gated tick leaves the stored states untouched.  With no hotkey
//! configured the poller is always active.
//!
//! # Threading
//!
//! [`KeyPoller::spawn`] runs the loop on a dedicated thread that checks a
//! shared `running` flag every tick and sleeps a fixed interval between
//! ticks.  The registry is shared through a `Mutex`, locked only while a
//! transition is being dispatched.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use iniconf_core::{ActionType, Registry};
use tracing::{debug, error, info, warn};

use super::dispatch::execute_bind;
use super::keybinds::KeybindTable;
use super::recorder::KeyRecorder;
use crate::infrastructure::key_state::KeyStateOracle;

/// Result of a single [`KeyPoller::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A hotkey is configured and was not held; nothing was sampled.
    Gated,
    /// Bindings were sampled; counts of dispatched transitions.
    Scanned { pressed: usize, released: usize },
}

/// Polls bound keys and dispatches their commands on transitions.
pub struct KeyPoller {
    table: KeybindTable,
    oracle: Arc<dyn KeyStateOracle>,
    registry: Arc<Mutex<Registry>>,
    recorder: Option<Arc<KeyRecorder>>,
    previous: HashMap<String, bool>,
}

impl KeyPoller {
    pub fn new(
        table: KeybindTable,
        oracle: Arc<dyn KeyStateOracle>,
        registry: Arc<Mutex<Registry>>,
    ) -> Self {
        Self {
            table,
            oracle,
            registry,
            recorder: None,
            previous: HashMap::new(),
        }
    }

    /// Also services `recorder` on every tick, gated or not.
    pub fn with_recorder(mut self, recorder: Arc<KeyRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn table(&self) -> &KeybindTable {
        &self.table
    }

    /// Last sampled state of `key_name`; `false` if never sampled.
    pub fn is_down(&self, key_name: &str) -> bool {
        self.previous.get(key_name).copied().unwrap_or(false)
    }

    /// Runs one sampling pass.
    pub fn tick(&mut self) -> TickOutcome {
        self.service_recorder();

        if let Some(hotkey) = self.table.hotkey() {
            if !self.oracle.is_key_down(hotkey) {
                return TickOutcome::Gated;
            }
        }

        let mut transitions = Vec::new();
        for (name, code, _) in self.table.bindings() {
            let down = self.oracle.is_key_down(code);
            let was_down = self.previous.get(name).copied().unwrap_or(false);
            if down && !was_down {
                transitions.push((name.to_string(), ActionType::OnPress));
            } else if !down && was_down {
                transitions.push((name.to_string(), ActionType::OnRelease));
            }
            self.previous.insert(name.to_string(), down);
        }

        let mut pressed = 0;
        let mut released = 0;
        if !transitions.is_empty() {
            let mut registry = lock_registry(&self.registry);
            for (name, action) in &transitions {
                let report = execute_bind(&self.table, &mut registry, name, *action);
                debug!(key = %name, %action, applied = report.applied, skipped = report.skipped, "bind executed");
                match action {
                    ActionType::OnPress => pressed += 1,
                    ActionType::OnRelease => released += 1,
                }
            }
        }

        TickOutcome::Scanned { pressed, released }
    }

    /// Ticks until `running` is cleared, sleeping `interval` after each tick.
    pub fn run(&mut self, running: &AtomicBool, interval: Duration) {
        info!(
            bindings = self.table.len(),
            hotkey = ?self.table.hotkey(),
            interval_ms = interval.as_millis() as u64,
            "key poller started"
        );
        while running.load(Ordering::Relaxed) {
            self.tick();
            thread::sleep(interval);
        }
        info!("key poller stopped");
    }

    /// Moves the poller onto a dedicated thread running [`KeyPoller::run`].
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(mut self, running: Arc<AtomicBool>, interval: Duration) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("iniconf-poll".to_string())
            .spawn(move || self.run(&running, interval))
    }

    fn service_recorder(&self) {
        let Some(recorder) = &self.recorder else {
            return;
        };
        if !recorder.is_recording() {
            return;
        }
        let mut registry = lock_registry(&self.registry);
        if let Err(e) = recorder.poll(self.oracle.as_ref(), &mut registry) {
            error!("key recording failed: {e}");
        }
    }
}

fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("registry lock poisoned, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::key_state::mock::ScriptedKeyState;
    use crate::infrastructure::key_state::MockKeyStateOracle;
    use iniconf_core::KeyBind;

    const F1: i32 = 0x70;
    const ALT: i32 = 0x12;

    fn setup(hotkey: Option<i32>) -> (KeyPoller, Arc<ScriptedKeyState>, Arc<Mutex<Registry>>, usize) {
        let mut registry = Registry::new();
        let idx = registry.declare("testBool", "Section1", false).expect("declare");
        let registry = Arc::new(Mutex::new(registry));

        let mut table = KeybindTable::new();
        table.set_hotkey(hotkey);
        table.insert(
            "F1",
            F1,
            "OnPress:Section1.testBool=true|OnRelease:Section1.testBool=false",
        );

        let keys = Arc::new(ScriptedKeyState::new());
        let poller = KeyPoller::new(table, keys.clone(), registry.clone());
        (poller, keys, registry, idx)
    }

    fn test_bool(registry: &Mutex<Registry>, idx: usize) -> bool {
        registry.lock().expect("lock").get::<bool>(idx).expect("get")
    }

    #[test]
    fn test_press_then_release_fires_once_each() {
        // Arrange
        let (mut poller, keys, registry, idx) = setup(Some(ALT));
        keys.press(ALT);

        // Act / Assert: tick 1, key goes down
        keys.press(F1);
        assert_eq!(poller.tick(), TickOutcome::Scanned { pressed: 1, released: 0 });
        assert!(test_bool(&registry, idx));

        // Key still down: no repeat
        assert_eq!(poller.tick(), TickOutcome::Scanned { pressed: 0, released: 0 });

        // Key released
        keys.release(F1);
        assert_eq!(poller.tick(), TickOutcome::Scanned { pressed: 0, released: 1 });
        assert!(!test_bool(&registry, idx));

        // Still up: no repeat
        assert_eq!(poller.tick(), TickOutcome::Scanned { pressed: 0, released: 0 });
    }

    #[test]
    fn test_released_hotkey_gates_scan_and_keeps_state() {
        // Arrange
        let (mut poller, keys, registry, idx) = setup(Some(ALT));
        keys.press(F1);

        // Act
        let outcome = poller.tick();

        // Assert
        assert_eq!(outcome, TickOutcome::Gated);
        assert!(!poller.is_down("F1"));
        assert!(!test_bool(&registry, idx));
        assert_eq!(keys.query_count(), 1);
    }

    #[test]
    fn test_no_hotkey_means_always_active() {
        let (mut poller, keys, registry, idx) = setup(None);
        keys.press(F1);

        assert_eq!(poller.tick(), TickOutcome::Scanned { pressed: 1, released: 0 });
        assert!(test_bool(&registry, idx));
        assert!(poller.is_down("F1"));
    }

    #[test]
    fn test_first_tick_with_key_up_fires_nothing() {
        // Arrange
        let mut registry = Registry::new();
        registry.declare("testBool", "Section1", false).expect("declare");
        let mut table = KeybindTable::new();
        table.insert("F1", F1, "OnRelease:Section1.testBool=true");
        let mut oracle = MockKeyStateOracle::new();
        oracle.expect_is_key_down().times(1).return_const(false);
        let mut poller = KeyPoller::new(table, Arc::new(oracle), Arc::new(Mutex::new(registry)));

        // Act / Assert
        assert_eq!(poller.tick(), TickOutcome::Scanned { pressed: 0, released: 0 });
    }

    #[test]
    fn test_armed_recorder_is_serviced_even_when_gated() {
        // Arrange
        let mut registry = Registry::new();
        let key_idx = registry
            .declare("TestKey", "Section1", KeyBind::new(0x04))
            .expect("declare");
        let registry = Arc::new(Mutex::new(registry));
        let mut table = KeybindTable::new();
        table.set_hotkey(Some(ALT));
        let keys = Arc::new(ScriptedKeyState::new());
        let recorder = Arc::new(KeyRecorder::new());
        let mut poller =
            KeyPoller::new(table, keys.clone(), registry.clone()).with_recorder(recorder.clone());
        recorder.start(key_idx);
        keys.press(0x42);

        // Act
        let outcome = poller.tick();

        // Assert
        assert_eq!(outcome, TickOutcome::Gated);
        assert!(!recorder.is_recording());
        let code = registry
            .lock()
            .expect("lock")
            .get::<KeyBind>(key_idx)
            .expect("get")
            .code();
        assert_eq!(code, 0x42);
    }

    #[test]
    fn test_spawned_loop_stops_when_flag_cleared() {
        // Arrange
        let (poller, keys, registry, idx) = setup(None);
        keys.press(F1);
        let running = Arc::new(AtomicBool::new(true));

        // Act
        let handle = poller
            .spawn(Arc::clone(&running), Duration::from_millis(1))
            .expect("spawn");
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !test_bool(&registry, idx) && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        running.store(false, Ordering::Relaxed);

        // Assert
        handle.join().expect("poll thread panicked");
        assert!(test_bool(&registry, idx));
    }
}
