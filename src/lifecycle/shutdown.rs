//! Shutdown coordination for the admin server.

use tokio::sync::broadcast;

/// Signals the admin server to stop accepting requests.
///
/// `serve` subscribes once, before the signal listener starts, and hands the
/// receiver to axum's graceful shutdown. Clones share the same channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. A no-op when nobody subscribed.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Resolve once the signal fires or every `Shutdown` is dropped.
    pub async fn wait(mut rx: broadcast::Receiver<()>) {
        let _ = rx.recv().await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
