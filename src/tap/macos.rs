//! Quartz event tap backend
//!
//! Installs a `CGEventTap` on the calling thread's CFRunLoop. The run loop
//! must be the main one: [`StopHandle::stop`] wakes `CFRunLoop::get_main()`.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use core_foundation::base::TCFType;
use core_foundation::mach_port::CFMachPortRef;
use core_foundation::runloop::{
    kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop, CFRunLoopSource,
};
use core_graphics::event::{
    CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventTapProxy, CGEventType, EventField,
};
use tracing::{debug, warn};

use crate::config::TapLocation;
use crate::keys::{KeyCode, ModifierState};

use super::api::{EventMask, EventTapApi, KeyDown, KeyDownHandler};

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapIsEnabled(tap: CFMachPortRef) -> bool;
}

/// How long one run loop pass may sleep before the stop flag is rechecked
const RUN_SLICE: Duration = Duration::from_secs(1);

/// Stops a running [`QuartzEventTap`] from any thread
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        CFRunLoop::get_main().stop();
    }
}

/// The macOS input-monitoring API
pub struct QuartzEventTap {
    location: TapLocation,
    running: Arc<AtomicBool>,
}

impl QuartzEventTap {
    pub fn new(location: TapLocation) -> Self {
        Self {
            location,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }
}

fn cg_location(location: TapLocation) -> CGEventTapLocation {
    match location {
        TapLocation::Hid => CGEventTapLocation::HID,
        TapLocation::Session => CGEventTapLocation::Session,
        TapLocation::AnnotatedSession => CGEventTapLocation::AnnotatedSession,
    }
}

impl EventTapApi for QuartzEventTap {
    type Tap = CGEventTap<'static>;
    type Source = CFRunLoopSource;

    fn has_elevated_privileges(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail
        unsafe { libc::geteuid() == 0 }
    }

    fn create_tap(
        &mut self,
        mask: EventMask,
        handler: Rc<dyn KeyDownHandler>,
    ) -> Option<Self::Tap> {
        let mut events = Vec::new();
        if mask.contains_key_down() {
            events.push(CGEventType::KeyDown);
        }

        // Runs on the event delivery path: must be fast and must not panic
        let callback = move |_proxy: CGEventTapProxy,
                             event_type: CGEventType,
                             event: &CGEvent|
                             -> Option<CGEvent> {
            match event_type {
                CGEventType::KeyDown => {
                    let code = KeyCode::from_raw(
                        event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE),
                    );
                    let modifiers = ModifierState::from_flags(event.get_flags().bits());
                    handler.on_key_down(KeyDown { code, modifiers });
                }
                CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                    warn!("event tap disabled by the system, key events may be missed");
                }
                _ => {}
            }
            // Observe only: hand the event back untouched
            Some(event.clone())
        };

        match CGEventTap::new(
            cg_location(self.location),
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::Default,
            events,
            callback,
        ) {
            Ok(tap) => {
                debug!(location = ?self.location, "event tap created");
                Some(tap)
            }
            Err(()) => None,
        }
    }

    fn enable_tap(&mut self, tap: &Self::Tap) {
        tap.enable();
    }

    fn is_tap_enabled(&self, tap: &Self::Tap) -> bool {
        // SAFETY: the mach port is owned by `tap` and alive for this call
        unsafe { CGEventTapIsEnabled(tap.mach_port.as_concrete_TypeRef()) }
    }

    fn create_run_loop_source(&mut self, tap: &Self::Tap) -> Option<Self::Source> {
        tap.mach_port.create_runloop_source(0).ok()
    }

    fn add_source_to_current_run_loop(&mut self, source: &Self::Source) {
        let run_loop = CFRunLoop::get_current();
        unsafe {
            run_loop.add_source(source, kCFRunLoopCommonModes);
        }
    }

    fn run(&mut self) {
        while self.running.load(Ordering::SeqCst) {
            unsafe {
                let _ = CFRunLoop::run_in_mode(kCFRunLoopDefaultMode, RUN_SLICE, false);
            }
        }
        debug!("run loop stopped");
    }

    fn release_source(&mut self, source: Self::Source) {
        let run_loop = CFRunLoop::get_current();
        unsafe {
            if run_loop.contains_source(&source, kCFRunLoopCommonModes) {
                run_loop.remove_source(&source, kCFRunLoopCommonModes);
            }
        }
        drop(source);
    }

    fn release_tap(&mut self, tap: Self::Tap) {
        // Dropping the tap releases its mach port
        drop(tap);
    }
}
