//! Process wiring: the liveness endpoint and the reconnect loop share one lifetime.

use std::future::Future;

use tracing::{error, info};

use ptb_core::{
    config::Config,
    resilience::{RetryPolicy, SessionConnector, SessionLoop},
    Result,
};
use ptb_http::LivenessServer;

/// Run the chat session until it ends, the credential is rejected, or `shutdown`
/// resolves. The liveness server is stopped once on every one of those paths.
pub async fn run<C, F>(
    cfg: &Config,
    liveness: LivenessServer,
    connector: C,
    shutdown: F,
) -> Result<()>
where
    C: SessionConnector,
    F: Future<Output = ()>,
{
    let mut session_loop = SessionLoop::new(connector, RetryPolicy::from_config(cfg));

    let outcome = tokio::select! {
        res = session_loop.run() => res.map(|report| {
            info!(attempts = report.attempts, "session loop finished");
        }),
        _ = shutdown => {
            info!("shutdown signal received; stopping");
            Ok(())
        }
    };

    if let Err(e) = liveness.shutdown().await {
        error!(error = %e, "failed to stop liveness endpoint cleanly");
    }

    if let Err(e) = &outcome {
        error!(error = %e, "bot stopped with an error");
    }
    outcome
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
