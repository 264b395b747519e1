//! OS signal handling.
//!
//! First Ctrl-C cancels in-flight workers so the run still reports every
//! account; a second one exits immediately.

use crate::lifecycle::shutdown::Shutdown;

/// Exit status used when the user forces termination.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Spawn the Ctrl-C listener for a run.
pub fn spawn_ctrl_c_handler(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        tracing::warn!("Interrupt received, cancelling in-flight transfers (press Ctrl-C again to force exit)");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::error!("Second interrupt received, exiting");
            std::process::exit(FORCED_EXIT_CODE);
        }
    })
}
