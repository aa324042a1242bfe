//! HTTP server lifecycle.
//!
//! A [`Server`] is bound by [`Server::init`], driven by [`Server::run`], and
//! stopped through a [`ShutdownHandle`]. Shutdown stops accepting new
//! connections and lets in-flight requests finish; if they do not finish
//! within the configured window, `run` returns
//! [`ServerError::ShutdownTimeout`].
//!
//! ```rust,ignore
//! let server = Server::init(app, &config).await?;
//! let handle = server.shutdown_handle();
//! tokio::spawn(async move {
//!     shutdown_signal().await;
//!     handle.shutdown();
//! });
//! server.run().await?;
//! ```

use std::future::IntoFuture;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::config::ServerConfig;

/// Errors from binding, serving or shutting down.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The accept loop failed.
    #[error("server error: {0}")]
    Io(#[from] io::Error),

    /// In-flight requests outlived the shutdown window.
    #[error("graceful shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Triggers graceful shutdown of a running [`Server`].
///
/// Cloneable; only the first call to [`shutdown`](Self::shutdown) has an effect.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl ShutdownHandle {
    /// Begins graceful shutdown.
    pub fn shutdown(&self) {
        if let Some(sender) = self.sender.lock().take() {
            let _ = sender.send(());
        }
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// A bound, not yet running HTTP server.
pub struct Server {
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
    handle: ShutdownHandle,
    shutdown_rx: oneshot::Receiver<()>,
}

impl Server {
    /// Binds the configured address.
    pub async fn init(app: Router, config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        let (tx, shutdown_rx) = oneshot::channel();
        Ok(Self {
            listener,
            app,
            shutdown_timeout: config.shutdown_timeout(),
            handle: ShutdownHandle {
                sender: Arc::new(Mutex::new(Some(tx))),
            },
            shutdown_rx,
        })
    }

    /// Returns the bound address (useful when binding port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns a handle that stops this server.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.handle.clone()
    }

    /// Serves requests until shutdown is requested and in-flight requests drain.
    pub async fn run(self) -> Result<(), ServerError> {
        let Server {
            listener,
            app,
            shutdown_timeout,
            handle: _handle,
            shutdown_rx,
        } = self;

        if let Ok(addr) = listener.local_addr() {
            info!(address = %addr, "Server listening");
        }

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let signal = async move {
            let _ = shutdown_rx.await;
            info!("Shutdown requested, draining in-flight requests");
            let _ = draining_tx.send(());
        };

        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                result?;
                info!("Server stopped");
                return Ok(());
            }
            _ = draining_rx => {}
        }

        match tokio::time::timeout(shutdown_timeout, serve).await {
            Ok(result) => {
                result?;
                info!("Server stopped");
                Ok(())
            }
            Err(_) => {
                warn!(timeout = ?shutdown_timeout, "Forcing shutdown with requests still in flight");
                Err(ServerError::ShutdownTimeout(shutdown_timeout))
            }
        }
    }
}

/// Completes on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_handle_is_idempotent() {
        let (tx, mut rx) = oneshot::channel();
        let handle = ShutdownHandle {
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        let clone = handle.clone();

        assert!(!handle.is_triggered());
        handle.shutdown();
        clone.shutdown();
        assert!(clone.is_triggered());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            port: taken.local_addr().unwrap().port(),
            ..ServerConfig::for_testing()
        };

        let err = Server::init(Router::new(), &config).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
