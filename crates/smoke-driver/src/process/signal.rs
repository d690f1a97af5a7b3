//! Termination signal handling.

use crate::result::Result;
use tracing::info;

/// Signal number of SIGINT.
pub const SIGINT: i32 = 2;

/// Signal number of SIGTERM.
pub const SIGTERM: i32 = 15;

/// Wait for SIGINT or SIGTERM and return its signal number.
///
/// Pair with [`InstanceRegistry::teardown`](super::InstanceRegistry::teardown)
/// to kill live instances and obtain the `128 + signal` exit code.
pub async fn wait_for_shutdown_signal() -> Result<i32> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
                Ok(SIGTERM)
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal (Ctrl+C)");
                Ok(SIGINT)
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received SIGINT signal (Ctrl+C)");
        Ok(SIGINT)
    }
}
