//! OS signal handling.
//!
//! - SIGTERM/SIGINT trigger graceful shutdown
//! - SIGHUP reloads the configuration file, not shutdown

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::config::SharedConfig;
use crate::lifecycle::shutdown::Shutdown;

/// Wait for Ctrl+C or SIGTERM, then trigger shutdown.
pub async fn shutdown_on_signal(shutdown: Shutdown) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = shutdown.wait() => return,
    }

    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}

/// Reload `path` into `config` on every SIGHUP until `shutdown` fires.
#[cfg(unix)]
pub async fn reload_on_hangup(path: PathBuf, config: SharedConfig, shutdown: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler");
            return;
        }
    };

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            received = hangup.recv() => {
                if received.is_none() {
                    break;
                }
                tracing::info!("Captured SIGHUP, reloading config...");
                config.reload_from_file(&path);
            }
        }
    }
}

#[cfg(not(unix))]
pub async fn reload_on_hangup(_path: PathBuf, _config: SharedConfig, shutdown: CancellationToken) {
    shutdown.cancelled().await;
}
