//! Modifier key state
//!
//! Only Shift takes part in decoding. The state is rebuilt from the raw
//! event flags on every key-down and never kept between events.

/// Raw flag masks from macOS CGEventFlags
pub mod flags {
    /// Shift key modifier flag (`kCGEventFlagMaskShift`)
    pub const SHIFT: u64 = 0x0002_0000;
}

/// Modifier keys held when a key-down event fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Either Shift key is held
    pub shift: bool,
}

impl ModifierState {
    /// Build the state from raw event flag bits
    pub fn from_flags(bits: u64) -> Self {
        Self {
            shift: bits & flags::SHIFT != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL: u64 = 0x0004_0000;
    const OPTION: u64 = 0x0008_0000;
    const COMMAND: u64 = 0x0010_0000;

    #[test]
    fn test_no_flags() {
        assert_eq!(ModifierState::from_flags(0), ModifierState::default());
    }

    #[test]
    fn test_shift_flag() {
        let state = ModifierState::from_flags(flags::SHIFT);
        assert!(state.shift);
        assert_eq!(state, ModifierState { shift: true });
    }

    #[test]
    fn test_other_modifiers_ignored() {
        let state = ModifierState::from_flags(CONTROL | OPTION | COMMAND);
        assert!(!state.shift);

        let state = ModifierState::from_flags(flags::SHIFT | COMMAND);
        assert!(state.shift);
    }

    #[test]
    fn test_non_modifier_bits_ignored() {
        // kCGEventFlagMaskNonCoalesced is set on most real events
        let state = ModifierState::from_flags(0x0000_0100);
        assert!(!state.shift);
    }
}
