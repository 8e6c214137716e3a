//! Connection acceptor
//!
//! Owns the listening socket and the shutdown broadcaster. Every accepted
//! connection gets its own task running a fresh session; the acceptor
//! never looks at protocol content and shares nothing with the sessions
//! except the shutdown signal.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::config::Timeouts;
use crate::error::AppError;
use crate::handler::handle_connection;

/// The listening side of the endpoint
pub struct Server {
    /// Listening socket, read-only after bind
    listener: TcpListener,
    /// Per-session I/O limits handed to every connection
    timeouts: Timeouts,
    /// Shutdown signal; each session and the accept loop subscribe
    shutdown: broadcast::Sender<()>,
}

impl Server {
    /// Bind the listener
    ///
    /// Failure here is fatal: the caller must not continue without it.
    pub async fn bind(addr: &str, timeouts: Timeouts) -> Result<Self, AppError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::bind(addr, e))?;
        let (shutdown, _) = broadcast::channel(1);

        Ok(Self {
            listener,
            timeouts,
            shutdown,
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        self.listener.local_addr().map_err(AppError::LocalAddr)
    }

    /// Handle for signalling shutdown to the accept loop and all sessions
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown.clone()
    }

    /// Run the accept loop until shutdown is signalled
    ///
    /// A failed accept is logged and the loop keeps going.
    pub async fn run(self) {
        let mut shutdown_rx = self.shutdown.subscribe();
        info!(
            addr = %self.listener.local_addr().map(|a| a.to_string()).unwrap_or_default(),
            "IRC server accepting connections"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signalled, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!("New connection from {}", addr);
                        let timeouts = self.timeouts;
                        let shutdown = self.shutdown.subscribe();

                        // Spawn handler task for each connection
                        tokio::spawn(async move {
                            if let Err(e) =
                                handle_connection(stream, addr.to_string(), timeouts, shutdown).await
                            {
                                error!("Connection handler error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        info!("IRC server stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0", Timeouts::default())
            .await
            .unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = Server::bind("127.0.0.1:0", Timeouts::default())
            .await
            .unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let err = Server::bind(&taken, Timeouts::default()).await.err().unwrap();
        assert!(matches!(err, AppError::Bind { .. }));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let server = Server::bind("127.0.0.1:0", Timeouts::default())
            .await
            .unwrap();
        let shutdown = server.shutdown_handle();
        let task = tokio::spawn(server.run());

        // The accept loop subscribes on start; retry until it is listening.
        while shutdown.send(()).is_err() {
            tokio::task::yield_now().await;
        }
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .expect("accept loop ignored shutdown")
            .unwrap();
    }
}
