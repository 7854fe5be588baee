//! System-wide key-down tap
//!
//! The [`HookController`] acquires a privileged event tap through an
//! [`EventTapApi`](api::EventTapApi) implementation and feeds every key-down into an
//! [`Emitter`], which decodes it and writes it to stdout.

mod api;
mod controller;
mod emitter;
#[cfg(test)]
mod fake;
#[cfg(target_os = "macos")]
mod macos;

pub use api::KeyDownHandler;
pub use controller::HookController;
pub use emitter::Emitter;
#[cfg(target_os = "macos")]
pub use macos::QuartzEventTap;
