//! The OS input-monitoring surface the controller drives
//!
//! Implemented by the Quartz event tap on macOS and by a recording
//! double in tests.

use std::rc::Rc;

use crate::keys::{KeyCode, ModifierState};

/// `kCGEventKeyDown`
const KEY_DOWN_EVENT_TYPE: u32 = 10;

/// Set of event types a tap subscribes to, one bit per `CGEventType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMask(u64);

impl EventMask {
    /// Key-down events only: no key-up, no flags-changed, no mouse
    pub const KEY_DOWN: Self = Self(1 << KEY_DOWN_EVENT_TYPE);

    /// Whether key-down events are part of the mask
    pub fn contains_key_down(self) -> bool {
        self.0 & Self::KEY_DOWN.0 != 0
    }

    /// Raw `CGEventMask` bits
    pub fn bits(self) -> u64 {
        self.0
    }
}

/// A key-down event as delivered to the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDown {
    /// Keycode of the pressed key
    pub code: KeyCode,
    /// Modifiers held at the time of the press
    pub modifiers: ModifierState,
}

/// Receives every key-down event the tap delivers
///
/// Runs inline on the OS event-delivery path: implementations must return
/// quickly, must not block and must not panic.
pub trait KeyDownHandler {
    fn on_key_down(&self, key: KeyDown);
}

/// Privileged input-monitoring operations
///
/// `release_*` take their resource by value, so each can be released at
/// most once.
pub trait EventTapApi {
    /// The live event tap
    type Tap;
    /// The tap's run loop registration
    type Source;

    /// Whether the process runs with the rights needed to tap global input
    fn has_elevated_privileges(&self) -> bool;

    /// Create a tap for the events in `mask`, delivering them to `handler`
    fn create_tap(&mut self, mask: EventMask, handler: Rc<dyn KeyDownHandler>)
        -> Option<Self::Tap>;

    fn enable_tap(&mut self, tap: &Self::Tap);

    fn is_tap_enabled(&self, tap: &Self::Tap) -> bool;

    fn create_run_loop_source(&mut self, tap: &Self::Tap) -> Option<Self::Source>;

    fn add_source_to_current_run_loop(&mut self, source: &Self::Source);

    /// Block the calling thread in the run loop until it is stopped
    fn run(&mut self);

    fn release_source(&mut self, source: Self::Source);

    fn release_tap(&mut self, tap: Self::Tap);
}
