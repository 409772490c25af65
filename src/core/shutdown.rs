use tokio::signal;

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut terminate = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(stream) => Some(stream),
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                None
            }
        };

        tokio::select! {
            result = signal::ctrl_c() => log_ctrl_c(result),
            _ = async {
                match terminate.as_mut() {
                    Some(stream) => { stream.recv().await; }
                    None => std::future::pending::<()>().await,
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    log_ctrl_c(signal::ctrl_c().await);

    tracing::info!("shutdown signal received");
}

fn log_ctrl_c(result: std::io::Result<()>) {
    if let Err(err) = result {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
    }
}
