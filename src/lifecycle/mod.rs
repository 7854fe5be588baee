//! Process lifecycle: graceful shutdown on SIGINT/SIGTERM

mod shutdown;

pub use shutdown::on_shutdown;
