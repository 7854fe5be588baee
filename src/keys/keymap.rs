//! Virtual keycode table for the US ANSI layout

use std::fmt;

/// A macOS virtual keycode (`CGKeyCode`)
///
/// Names a physical key position, not the character it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// Narrow the 64-bit `kCGKeyboardEventKeycode` field to a keycode
    pub fn from_raw(raw: i64) -> Self {
        Self(raw as u16)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the keycode table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct KeyMapping {
    pub code: KeyCode,
    pub unshifted: &'static str,
    pub shifted: &'static str,
}

const fn key(code: u16, unshifted: &'static str, shifted: &'static str) -> KeyMapping {
    KeyMapping {
        code: KeyCode(code),
        unshifted,
        shifted,
    }
}

/// Sorted by keycode; `lookup` relies on it.
pub(super) static KEY_MAP: &[KeyMapping] = &[
    key(0, "a", "A"),
    key(1, "s", "S"),
    key(2, "d", "D"),
    key(3, "f", "F"),
    key(4, "h", "H"),
    key(5, "g", "G"),
    key(6, "z", "Z"),
    key(7, "x", "X"),
    key(8, "c", "C"),
    key(9, "v", "V"),
    key(12, "q", "Q"),
    key(13, "w", "W"),
    key(14, "e", "E"),
    key(15, "r", "R"),
    key(16, "y", "Y"),
    key(17, "t", "T"),
    key(18, "1", "1"),
    key(19, "2", "2"),
    key(20, "3", "3"),
    key(21, "4", "4"),
    key(22, "6", "6"),
    key(23, "5", "5"),
    key(24, "=", "="),
    key(25, "9", "9"),
    key(26, "7", "7"),
    key(27, "-", "-"),
    key(28, "8", "8"),
    key(29, "0", "0"),
    key(30, "]", "]"),
    key(31, "o", "O"),
    key(32, "u", "U"),
    key(33, "[", "["),
    key(34, "i", "I"),
    key(35, "p", "P"),
    key(36, "Return", "Return"),
    key(37, "l", "L"),
    key(38, "j", "J"),
    key(39, "'", "'"),
    key(40, "k", "K"),
    key(41, ";", ";"),
    key(42, "\\", "\\"),
    key(43, ",", ","),
    key(44, "/", "/"),
    key(45, "n", "N"),
    key(46, "m", "M"),
    key(47, ".", "."),
    key(49, "Space", "Space"),
    key(50, "`", "`"),
    key(51, "Delete", "Delete"),
    key(53, "Escape", "Escape"),
];

/// Find the table row for `code`
pub(super) fn lookup(code: KeyCode) -> Option<&'static KeyMapping> {
    KEY_MAP
        .binary_search_by_key(&code, |m| m.code)
        .ok()
        .map(|idx| &KEY_MAP[idx])
}
