//! Keycode + modifier to symbol resolution

use std::fmt;

use super::keymap::{self, KeyCode};
use super::modifiers::ModifierState;

/// Table token for the space bar, written out as a literal space
const SPACE_TOKEN: &str = "Space";

/// The decoded form of a single key-down event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// A symbol from the keycode table: one character or a named token
    /// such as "Return" or "Escape"
    Key(&'static str),
    /// The keycode has no table entry
    Unknown(KeyCode),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Key(SPACE_TOKEN) => f.write_str(" "),
            Symbol::Key(text) => f.write_str(text),
            Symbol::Unknown(code) => write!(f, "[Unknown Key: {code}] "),
        }
    }
}

/// Decode a key-down event
///
/// Never fails: keycodes missing from the table come back as
/// [`Symbol::Unknown`] so that no event is silently dropped.
pub fn decode(code: KeyCode, modifiers: ModifierState) -> Symbol {
    decode_shifted(code, modifiers.shift)
}

/// Decode a key-down event given only whether Shift is held
pub fn decode_shifted(code: KeyCode, shift_held: bool) -> Symbol {
    match keymap::lookup(code) {
        Some(mapping) if shift_held => Symbol::Key(mapping.shifted),
        Some(mapping) => Symbol::Key(mapping.unshifted),
        None => Symbol::Unknown(code),
    }
}
