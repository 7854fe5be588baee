//! Event tap lifecycle
//!
//! Walks the tap through privilege check, creation, enabling and the
//! blocking run loop, and releases what it acquired on the way out.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, info};

use super::api::{EventMask, EventTapApi, KeyDownHandler};

/// Lifecycle states of the hook controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapState {
    /// Privileges not yet verified
    #[default]
    Unprivileged,
    /// Creating the event tap
    Acquiring,
    /// Tap created, turning it on
    Enabling,
    /// Blocked in the run loop, delivering events
    Running,
    /// Run loop stopped, releasing resources
    Terminating,
    /// Setup failed; nothing is held
    Failed,
}

impl fmt::Display for TapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapState::Unprivileged => write!(f, "Unprivileged"),
            TapState::Acquiring => write!(f, "Acquiring"),
            TapState::Enabling => write!(f, "Enabling"),
            TapState::Running => write!(f, "Running"),
            TapState::Terminating => write!(f, "Terminating"),
            TapState::Failed => write!(f, "Failed"),
        }
    }
}

/// Fatal setup failures
#[derive(Debug, thiserror::Error)]
pub enum TapError {
    #[error("Run this program with elevated privileges.")]
    PrivilegeDenied,

    #[error("Could not create event tap. Accessibility permissions are required.")]
    TapCreation,

    #[error("Event tap is not enabled. SIP or Accessibility permissions might block this.")]
    TapNotEnabled,

    #[error("Could not create a run loop source for the event tap.")]
    RunLoopSource,
}

impl TapError {
    /// Process exit status for this failure class
    pub fn exit_code(&self) -> u8 {
        match self {
            TapError::PrivilegeDenied => 2,
            TapError::TapCreation => 3,
            TapError::TapNotEnabled => 4,
            TapError::RunLoopSource => 5,
        }
    }
}

/// Owns the event tap and drives it from setup to teardown
pub struct HookController<A: EventTapApi> {
    api: A,
    state: TapState,
}

impl<A: EventTapApi> HookController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: TapState::Unprivileged,
        }
    }

    /// Get the current state
    pub fn state(&self) -> TapState {
        self.state
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Install the tap and block delivering key-down events to `handler`
    ///
    /// Returns `Ok(())` once the run loop has been stopped and the tap torn
    /// down. Setup failures are returned immediately; no step is retried.
    pub fn run(&mut self, handler: Rc<dyn KeyDownHandler>) -> Result<(), TapError> {
        if !self.api.has_elevated_privileges() {
            return Err(self.fail(TapError::PrivilegeDenied));
        }

        self.transition_to(TapState::Acquiring);

        let mask = EventMask::KEY_DOWN;
        debug!(mask = mask.bits(), "creating event tap");

        let Some(tap) = self.api.create_tap(mask, handler) else {
            return Err(self.fail(TapError::TapCreation));
        };

        self.transition_to(TapState::Enabling);
        self.api.enable_tap(&tap);

        // The tap can be created yet left disabled by OS policy
        if !self.api.is_tap_enabled(&tap) {
            self.api.release_tap(tap);
            return Err(self.fail(TapError::TapNotEnabled));
        }

        let Some(source) = self.api.create_run_loop_source(&tap) else {
            self.api.release_tap(tap);
            return Err(self.fail(TapError::RunLoopSource));
        };

        self.api.add_source_to_current_run_loop(&source);
        self.transition_to(TapState::Running);

        info!("Listening for key events... Press Ctrl+C to exit.");
        self.api.run();

        self.transition_to(TapState::Terminating);

        // Reverse of acquisition order
        self.api.release_source(source);
        self.api.release_tap(tap);

        info!("event tap released");

        Ok(())
    }

    fn fail(&mut self, err: TapError) -> TapError {
        error!(state = %self.state, %err, "event tap setup failed");
        self.transition_to(TapState::Failed);
        err
    }

    fn transition_to(&mut self, new_state: TapState) {
        info!(from = %self.state, to = %new_state, "state transition");
        self.state = new_state;
    }
}
