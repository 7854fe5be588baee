//! Recording stand-in for the OS event tap API

use std::cell::RefCell;
use std::rc::Rc;

use super::api::{EventMask, EventTapApi, KeyDown, KeyDownHandler};

/// Calls made against the fake, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HasElevatedPrivileges,
    CreateTap(EventMask),
    EnableTap,
    IsTapEnabled,
    CreateRunLoopSource,
    AddSource,
    Run,
    ReleaseSource,
    ReleaseTap,
}

/// Where setup should go wrong, if anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeds,
    Unprivileged,
    CreateFails,
    StaysDisabled,
    SourceFails,
}

pub struct FakeTap;

pub struct FakeSource;

pub struct FakeTapApi {
    outcome: Outcome,
    calls: RefCell<Vec<Call>>,
    handler: Option<Rc<dyn KeyDownHandler>>,
    pending: Vec<KeyDown>,
    live: usize,
}

impl FakeTapApi {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: RefCell::default(),
            handler: None,
            pending: Vec::new(),
            live: 0,
        }
    }

    /// Key-downs handed to the callback once `run` is entered
    pub fn deliver(mut self, keys: impl IntoIterator<Item = KeyDown>) -> Self {
        self.pending.extend(keys);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    /// Taps and sources created but not yet released
    pub fn live_resources(&self) -> usize {
        self.live
    }
}

impl EventTapApi for FakeTapApi {
    type Tap = FakeTap;
    type Source = FakeSource;

    fn has_elevated_privileges(&self) -> bool {
        self.record(Call::HasElevatedPrivileges);
        self.outcome != Outcome::Unprivileged
    }

    fn create_tap(
        &mut self,
        mask: EventMask,
        handler: Rc<dyn KeyDownHandler>,
    ) -> Option<Self::Tap> {
        self.record(Call::CreateTap(mask));
        if self.outcome == Outcome::CreateFails {
            return None;
        }
        if mask.contains_key_down() {
            self.handler = Some(handler);
        }
        self.live += 1;
        Some(FakeTap)
    }

    fn enable_tap(&mut self, _tap: &Self::Tap) {
        self.record(Call::EnableTap);
    }

    fn is_tap_enabled(&self, _tap: &Self::Tap) -> bool {
        self.record(Call::IsTapEnabled);
        self.outcome != Outcome::StaysDisabled
    }

    fn create_run_loop_source(&mut self, _tap: &Self::Tap) -> Option<Self::Source> {
        self.record(Call::CreateRunLoopSource);
        if self.outcome == Outcome::SourceFails {
            return None;
        }
        self.live += 1;
        Some(FakeSource)
    }

    fn add_source_to_current_run_loop(&mut self, _source: &Self::Source) {
        self.record(Call::AddSource);
    }

    fn run(&mut self) {
        self.record(Call::Run);
        if let Some(handler) = &self.handler {
            for key in self.pending.drain(..) {
                handler.on_key_down(key);
            }
        }
    }

    fn release_source(&mut self, _source: Self::Source) {
        self.record(Call::ReleaseSource);
        self.live -= 1;
    }

    fn release_tap(&mut self, _tap: Self::Tap) {
        self.record(Call::ReleaseTap);
        self.handler = None;
        self.live -= 1;
    }
}
