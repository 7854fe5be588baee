//! Keycode decoding
//!
//! Turns a macOS virtual keycode plus the modifier flags of a key-down
//! event into the text that gets streamed to stdout. Everything here is
//! pure: no state, no I/O.

mod decoder;
mod keymap;
mod modifiers;

pub use decoder::decode;
pub use keymap::KeyCode;
pub use modifiers::ModifierState;
