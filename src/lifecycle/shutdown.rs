//! Signal handling for graceful shutdown

use std::io;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{debug, info};

/// Handles shutdown signals (SIGTERM, SIGINT)
///
/// Handlers are installed on construction, so a signal that arrives before
/// [`wait`](Self::wait) is polled is not lost. Must be created inside a
/// tokio runtime.
pub struct ShutdownSignal {
    sigterm: Signal,
    sigint: Signal,
}

impl ShutdownSignal {
    /// Install the SIGTERM and SIGINT handlers
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for a shutdown signal
    pub async fn wait(&mut self) {
        tokio::select! {
            _ = self.sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = self.sigint.recv() => {
                debug!("received SIGINT");
            }
        }
    }
}

/// Run `callback` on a dedicated thread once SIGINT or SIGTERM arrives
///
/// Returns after the signal handlers are installed.
pub fn on_shutdown<F>(callback: F) -> Result<()>
where
    F: FnOnce() + Send + 'static,
{
    let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();

    thread::Builder::new()
        .name("shutdown-listener".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            runtime.block_on(async move {
                let mut shutdown = match ShutdownSignal::new() {
                    Ok(shutdown) => shutdown,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                shutdown.wait().await;
                info!("shutdown signal received");
            });

            callback();
        })
        .context("failed to spawn shutdown listener thread")?;

    ready_rx
        .recv()
        .context("shutdown listener exited during setup")?
        .context("failed to register signal handlers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_resolves_on_sigterm() {
        let mut shutdown = ShutdownSignal::new().unwrap();

        // SAFETY: a handler for SIGTERM is installed above
        unsafe {
            libc::kill(libc::getpid(), libc::SIGTERM);
        }

        tokio::time::timeout(Duration::from_secs(5), shutdown.wait())
            .await
            .expect("shutdown signal not observed");
    }
}
