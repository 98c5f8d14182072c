use tokio::signal;

/// Resolves on Ctrl+C, or SIGTERM on unix, so the shell leaves its read loop
/// instead of dying mid-request.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {},
                    _ = terminate.recv() => tracing::info!("SIGTERM received, closing shell"),
                }
                return;
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "SIGTERM handler unavailable, listening for Ctrl+C only"
                )
            }
        }
    }

    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupted, closing shell"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
