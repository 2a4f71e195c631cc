//! Integration tests for the keybinder.
//!
//! These tests build the registry, key tables and poller from real files in a
//! temporary directory and drive key states through [`ScriptedKeyState`],
//! exercising load, dispatch and save together.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use iniconf_core::{Color, KeyData, Registry, StdFileStore};
use iniconf_keybinder::application::keybinds::KeybindTable;
use iniconf_keybinder::application::poll::{KeyPoller, TickOutcome};
use iniconf_keybinder::infrastructure::key_state::mock::ScriptedKeyState;

const F1: i32 = 112;
const F2: i32 = 113;
const ALT: i32 = 18;

const KEY_NAMES: &str = "[KeyNames]\n112=F1\n113=F2\n18=Alt Key\n\n[AimMode]\n0=Off\n1=Hold\n";

const KEYBINDS: &str = "[KeyBinder]\nHotKey=Alt Key\n\n[KeyBinds]\n\
    OnPress:Section1.testBool=true|OnRelease:Section1.testBool=false=F1\n\
    OnPress:Section1testBool=true|OnPress:Section2.color1=0,255,0,255=F2\n";

struct Fixture {
    _dir: tempfile::TempDir,
    registry: Arc<Mutex<Registry>>,
    keys: Arc<ScriptedKeyState>,
    poller: KeyPoller,
    test_bool: usize,
    color1: usize,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("UiAndKeyData"), KEY_NAMES).expect("write key names");
    fs::write(dir.path().join("keybinds"), KEYBINDS).expect("write keybinds");

    let mut registry = Registry::new();
    registry.set_config_directory(dir.path());
    let test_bool = registry.declare("testBool", "Section1", false).expect("declare");
    let color1 = registry
        .declare("color1", "Section2", Color::new(255, 0, 0, 255))
        .expect("declare");

    let key_data =
        KeyData::load(&StdFileStore, &dir.path().join("UiAndKeyData")).expect("key names");
    let table = KeybindTable::load(&StdFileStore, &dir.path().join("keybinds"), &key_data)
        .expect("keybinds");

    let registry = Arc::new(Mutex::new(registry));
    let keys = Arc::new(ScriptedKeyState::new());
    let poller = KeyPoller::new(table, keys.clone(), Arc::clone(&registry));

    Fixture {
        _dir: dir,
        registry,
        keys,
        poller,
        test_bool,
        color1,
    }
}

fn test_bool(f: &Fixture) -> bool {
    f.registry
        .lock()
        .expect("lock")
        .get::<bool>(f.test_bool)
        .expect("get")
}

#[test]
fn test_press_and_release_toggle_bound_value() {
    // Arrange
    let mut f = fixture();
    f.keys.press(ALT);

    // Act / Assert: tick 1, F1 down
    f.keys.press(F1);
    assert_eq!(
        f.poller.tick(),
        TickOutcome::Scanned { pressed: 1, released: 0 }
    );
    assert!(test_bool(&f));

    // tick 2, F1 up
    f.keys.release(F1);
    assert_eq!(
        f.poller.tick(),
        TickOutcome::Scanned { pressed: 0, released: 1 }
    );
    assert!(!test_bool(&f));

    // tick 3, unchanged: nothing fires
    assert_eq!(
        f.poller.tick(),
        TickOutcome::Scanned { pressed: 0, released: 0 }
    );
    assert!(!test_bool(&f));
}

#[test]
fn test_malformed_segment_is_skipped_but_sibling_runs() {
    // Arrange
    let mut f = fixture();
    f.keys.press(ALT);
    f.keys.press(F2);

    // Act
    f.poller.tick();

    // Assert
    let registry = f.registry.lock().expect("lock");
    assert!(!registry.get::<bool>(f.test_bool).expect("get"));
    assert_eq!(
        registry.get::<Color>(f.color1).expect("get"),
        Color::new(0, 255, 0, 255)
    );
}

#[test]
fn test_nothing_fires_without_hotkey() {
    let mut f = fixture();
    f.keys.press(F1);

    assert_eq!(f.poller.tick(), TickOutcome::Gated);
    assert!(!test_bool(&f));
}

#[test]
fn test_dispatched_values_are_saved_next_to_other_sections() {
    // Arrange
    let mut f = fixture();
    let config = f.registry.lock().expect("lock").config_path("test");
    fs::write(&config, "[Unrelated]\nkeep=me\n").expect("seed");
    f.keys.press(ALT);
    f.keys.press(F1);

    // Act
    f.poller.tick();
    f.registry.lock().expect("lock").save("test").expect("save");

    // Assert
    let text = fs::read_to_string(&config).expect("read");
    assert!(text.starts_with("[Unrelated]\nkeep=me\n"));
    assert!(text.contains("[Section1]\ntestBool=true\n"));
    assert!(text.contains("[Section2]\ncolor1=255,0,0,255\n"));
}

#[test]
fn test_menu_labels_are_available_from_key_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("UiAndKeyData");
    fs::write(&path, KEY_NAMES).expect("write");

    let data = KeyData::load(&StdFileStore, Path::new(&path)).expect("load");

    assert_eq!(data.menu_label("AimMode", 1), Some("Hold"));
    assert_eq!(data.code_of("Alt Key"), Some(ALT));
}
