//! Shutdown coordination for the server.

use std::future::Future;

use tokio::sync::broadcast;

use crate::lifecycle::signals::shutdown_signal;

/// Coordinator for graceful shutdown.
///
/// Servers wait on [`Shutdown::listen`], which resolves on an OS signal or
/// an explicit [`Shutdown::trigger`] (tests, embedding).
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future that completes when the server should stop.
    pub fn listen(&self) -> impl Future<Output = ()> + Send + 'static {
        shutdown_signal(self.tx.subscribe())
    }

    /// Ask every listener to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
