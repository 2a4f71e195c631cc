//! `GetAsyncKeyState`-backed key-state source.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for the Windows API FFI call.

#![cfg(target_os = "windows")]

use iniconf_core::KeyCode;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

use super::KeyStateOracle;

/// High bit of the `GetAsyncKeyState` result: the key is currently down.
const KEY_DOWN_MASK: u16 = 0x8000;

/// Samples the asynchronous key state of the whole system.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsKeyState;

impl KeyStateOracle for WindowsKeyState {
    fn is_key_down(&self, code: KeyCode) -> bool {
        if !(1..=255).contains(&code) {
            return false;
        }
        // SAFETY: GetAsyncKeyState takes a plain integer and has no
        // preconditions; out-of-range codes were filtered above.
        let state = unsafe { GetAsyncKeyState(code) };
        (state as u16) & KEY_DOWN_MASK != 0
    }
}
