use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use super::guards::ConnectionGuard;

/// Errors that can occur when trying to accept a connection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Server is shutting down")]
    Shutdown,
    #[error("Connection limit exceeded (current: {current}, limit: {limit})")]
    LimitExceeded { current: usize, limit: usize },
}

/// Manages connection limits and lifecycle
pub struct ConnectionManager {
    active_connections: Arc<AtomicUsize>,
    max_connections: usize,
    shutdown: AtomicBool,
    connections_closed_tx: watch::Sender<()>,
    connections_closed_rx: watch::Receiver<()>,
}

impl ConnectionManager {
    pub fn new(max_connections: usize) -> Self {
        let (connections_closed_tx, connections_closed_rx) = watch::channel(());
        Self {
            active_connections: Arc::new(AtomicUsize::new(0)),
            max_connections,
            shutdown: AtomicBool::new(false),
            connections_closed_tx,
            connections_closed_rx,
        }
    }

    pub fn active(&self) -> usize {
        self.active_connections.load(Ordering::Acquire)
    }

    /// Stop accepting new connections
    pub fn begin_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Try to accept a new connection
    /// Returns Ok(guard) if connection is accepted, Err(ConnectionError) if rejected
    pub fn try_accept(&self, peer: SocketAddr) -> Result<ConnectionGuard, ConnectionError> {
        if self.is_shutdown() {
            return Err(ConnectionError::Shutdown);
        }

        let current_connections = self.active_connections.load(Ordering::Acquire);
        if current_connections >= self.max_connections {
            warn!(
                current = current_connections,
                limit = self.max_connections,
                peer = %peer,
                "Connection limit exceeded, rejecting connection"
            );
            return Err(ConnectionError::LimitExceeded {
                current: current_connections,
                limit: self.max_connections,
            });
        }

        self.active_connections.fetch_add(1, Ordering::AcqRel);
        Ok(ConnectionGuard::new(
            self.active_connections.clone(),
            self.connections_closed_tx.clone(),
        ))
    }

    /// Wait until every connection has closed or `timeout` elapses.
    ///
    /// Returns the number of connections still open.
    pub async fn wait_for_drain(&self, timeout: Duration) -> usize {
        let mut closed = self.connections_closed_rx.clone();
        let drained = tokio::time::timeout(timeout, async {
            while self.active() > 0 {
                if closed.changed().await.is_err() {
                    break;
                }
            }
        })
        .await;

        let remaining = self.active();
        match drained {
            Ok(()) => info!("All connections closed"),
            Err(_) => warn!(
                active_connections = remaining,
                "Shutdown timeout reached with connections still active"
            ),
        }
        remaining
    }
}
