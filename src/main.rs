//! keystroke-tap: system-wide key-down interceptor for macOS
//!
//! Installs a Quartz event tap that sees every key-down on the host,
//! decodes the keycode and Shift state into text and streams it to stdout
//! as it happens.
//!
//! - Requires root and the Accessibility permission
//! - Observe only: events are never altered or suppressed
//! - Logs go to stderr, decoded keystrokes to stdout
//! - Runs until SIGINT/SIGTERM

#![cfg_attr(not(target_os = "macos"), allow(dead_code, unused_imports))]

mod config;
mod keys;
mod lifecycle;
mod tap;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for keystrokes
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "keystroke-tap starting"
    );

    run()
}

#[cfg(target_os = "macos")]
fn run() -> ExitCode {
    use std::rc::Rc;

    use tracing::{error, info};

    use crate::config::Config;
    use crate::tap::{Emitter, HookController, KeyDownHandler, QuartzEventTap};

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = ?e, "failed to load configuration");
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    info!(tap_location = %config.tap_location, "configuration loaded");

    let api = QuartzEventTap::new(config.tap_location);
    let stop = api.stop_handle();

    if let Err(e) = lifecycle::on_shutdown(move || stop.stop()) {
        error!(error = ?e, "failed to install shutdown handler");
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    let handler: Rc<dyn KeyDownHandler> = Rc::new(Emitter::stdout());
    let mut controller = HookController::new(api);

    match controller.run(handler) {
        Ok(()) => {
            info!("keystroke-tap stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn run() -> ExitCode {
    tracing::error!(os = std::env::consts::OS, "unsupported platform");
    eprintln!("Error: keystroke-tap only works on macOS.");
    ExitCode::FAILURE
}
