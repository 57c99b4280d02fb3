//! Liveness endpoint (axum).
//!
//! A single `GET /` route answering `pong`, so a hosting platform's health check
//! considers the process alive while the bot itself talks to Telegram.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ptb_core::{errors::Error, Result};

pub const PONG: &str = "pong";

pub fn router() -> Router {
    Router::new()
        .route("/", get(pong))
        .layer(TraceLayer::new_for_http())
}

async fn pong() -> &'static str {
    PONG
}

/// Running liveness server.
///
/// Call [`LivenessServer::shutdown`] to close the socket and wait for the server task.
/// Dropping the handle without it still tells the server to stop; either way the
/// stop signal is sent once.
pub struct LivenessServer {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl LivenessServer {
    /// Bind `addr` and start serving on a background task.
    pub async fn start(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            Error::Config(format!("failed to bind liveness listener on {addr}: {e}"))
        })?;
        let addr = listener.local_addr()?;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, router())
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        info!(%addr, "liveness endpoint listening");
        Ok(Self {
            addr,
            stop: Some(stop_tx),
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for the listener to close.
    pub async fn shutdown(mut self) -> Result<()> {
        self.signal_stop();
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        let res = task
            .await
            .map_err(|e| Error::External(format!("liveness task failed: {e}")))?;
        res?;
        info!(addr = %self.addr, "liveness endpoint stopped");
        Ok(())
    }

    fn signal_stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for LivenessServer {
    fn drop(&mut self) {
        if self.stop.is_some() {
            warn!(addr = %self.addr, "liveness endpoint dropped without shutdown; stopping");
            self.signal_stop();
        }
    }
}
