//! Windows Virtual Key (VK) code to display-name table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//! Windows VK codes range from 0x00 to 0xFF; mouse buttons occupy 0x01–0x06.
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key and mouse button a number called a
//! "Virtual Key code" (`VK_*` in `<winuser.h>`, e.g. `VK_MBUTTON = 0x04`,
//! `VK_F1 = 0x70`).  Key-bind items store this number, and the key-state
//! oracle answers "is this code down right now" for it.
//!
//! # How this table works
//!
//! `VK_NAME_TABLE` is a compile-time constant array of 256 optional names,
//! indexed by VK code.  Codes without a name (reserved / OEM-specific) store
//! `None`.  The names double as the built-in key-name directory used when no
//! companion key-name file is available.

use super::KeyCode;

/// Returns the display name of a VK code, if it has one.
///
/// Codes outside 0x00–0xFF always return `None`.
pub fn vk_name(code: KeyCode) -> Option<&'static str> {
    let index = usize::try_from(code).ok()?;
    VK_NAME_TABLE.get(index).copied().flatten()
}

/// Iterates every named VK code in ascending code order.
pub fn named_keys() -> impl Iterator<Item = (KeyCode, &'static str)> {
    VK_NAME_TABLE
        .iter()
        .enumerate()
        .filter_map(|(code, name)| name.map(|n| (code as KeyCode, n)))
}

const LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

const NUMPAD_DIGITS: [&str; 10] = [
    "Num 0", "Num 1", "Num 2", "Num 3", "Num 4", "Num 5", "Num 6", "Num 7", "Num 8", "Num 9",
];

const FUNCTION_KEYS: [&str; 24] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14",
    "F15", "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24",
];

/// Complete VK → name table indexed by VK code (0x00–0xFF).
const VK_NAME_TABLE: [Option<&str>; 256] = {
    let mut t: [Option<&str>; 256] = [None; 256];

    // ── Mouse buttons ─────────────────────────────────────────────────────────
    t[0x01] = Some("Left Mouse Button");   // VK_LBUTTON
    t[0x02] = Some("Right Mouse Button");  // VK_RBUTTON
    t[0x04] = Some("Middle Mouse Button"); // VK_MBUTTON
    t[0x05] = Some("X1 Mouse Button");     // VK_XBUTTON1
    t[0x06] = Some("X2 Mouse Button");     // VK_XBUTTON2

    // ── Alphabet keys (VK_A=0x41 … VK_Z=0x5A) ────────────────────────────────
    let mut i = 0;
    while i < LETTERS.len() {
        t[0x41 + i] = Some(LETTERS[i]);
        i += 1;
    }

    // ── Digit row (VK_0=0x30 … VK_9=0x39) and numpad (0x60 … 0x69) ──────────
    let mut i = 0;
    while i < DIGITS.len() {
        t[0x30 + i] = Some(DIGITS[i]);
        t[0x60 + i] = Some(NUMPAD_DIGITS[i]);
        i += 1;
    }

    // ── Function keys (VK_F1=0x70 … VK_F24=0x87) ─────────────────────────────
    let mut i = 0;
    while i < FUNCTION_KEYS.len() {
        t[0x70 + i] = Some(FUNCTION_KEYS[i]);
        i += 1;
    }

    // ── Control keys ─────────────────────────────────────────────────────────
    t[0x08] = Some("Backspace");    // VK_BACK
    t[0x09] = Some("Tab");          // VK_TAB
    t[0x0D] = Some("Enter");        // VK_RETURN
    t[0x10] = Some("Shift Key");    // VK_SHIFT
    t[0x11] = Some("Control Key");  // VK_CONTROL
    t[0x12] = Some("Alt Key");      // VK_MENU
    t[0x13] = Some("Pause");        // VK_PAUSE
    t[0x14] = Some("Caps Lock");    // VK_CAPITAL
    t[0x1B] = Some("Escape");       // VK_ESCAPE
    t[0x20] = Some("Space");        // VK_SPACE
    t[0x21] = Some("Page Up");      // VK_PRIOR
    t[0x22] = Some("Page Down");    // VK_NEXT
    t[0x23] = Some("End");          // VK_END
    t[0x24] = Some("Home");         // VK_HOME
    t[0x2C] = Some("Print Screen"); // VK_SNAPSHOT
    t[0x2D] = Some("Insert");       // VK_INSERT
    t[0x2E] = Some("Delete");       // VK_DELETE
    t[0x5D] = Some("Application");  // VK_APPS
    t[0x90] = Some("Num Lock");     // VK_NUMLOCK
    t[0x91] = Some("Scroll Lock");  // VK_SCROLL

    // ── Arrow keys ────────────────────────────────────────────────────────────
    t[0x25] = Some("Left");
    t[0x26] = Some("Up");
    t[0x27] = Some("Right");
    t[0x28] = Some("Down");

    // ── Numpad operators ──────────────────────────────────────────────────────
    t[0x6A] = Some("Num *");   // VK_MULTIPLY
    t[0x6B] = Some("Num +");   // VK_ADD
    t[0x6D] = Some("Num -");   // VK_SUBTRACT
    t[0x6E] = Some("Num Del"); // VK_DECIMAL
    t[0x6F] = Some("Num /");   // VK_DIVIDE

    // ── Sided modifier keys ───────────────────────────────────────────────────
    t[0x5B] = Some("Left Windows");  // VK_LWIN
    t[0x5C] = Some("Right Windows"); // VK_RWIN
    t[0xA0] = Some("Left Shift");    // VK_LSHIFT
    t[0xA1] = Some("Right Shift");   // VK_RSHIFT
    t[0xA2] = Some("Left Ctrl");     // VK_LCONTROL
    t[0xA3] = Some("Right Ctrl");    // VK_RCONTROL
    t[0xA4] = Some("Left Alt");      // VK_LMENU
    t[0xA5] = Some("Right Alt");     // VK_RMENU

    // ── Punctuation / symbols (US layout) ─────────────────────────────────────
    t[0xBA] = Some(";");  // VK_OEM_1
    t[0xBB] = Some("=");  // VK_OEM_PLUS
    t[0xBC] = Some(",");  // VK_OEM_COMMA
    t[0xBD] = Some("-");  // VK_OEM_MINUS
    t[0xBE] = Some(".");  // VK_OEM_PERIOD
    t[0xBF] = Some("/");  // VK_OEM_2
    t[0xC0] = Some("`");  // VK_OEM_3
    t[0xDB] = Some("[");  // VK_OEM_4
    t[0xDC] = Some("\\"); // VK_OEM_5
    t[0xDD] = Some("]");  // VK_OEM_6
    t[0xDE] = Some("'");  // VK_OEM_7

    t
};
