//! Logs every cache event as `key | kind | old value | new value`.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use catalog_core::cache::{CacheEvent, CachePubSub};

/// Background listener that writes one log line per cache event.
pub struct CacheEventLogger {
    receiver: broadcast::Receiver<CacheEvent>,
}

impl CacheEventLogger {
    pub fn new(receiver: broadcast::Receiver<CacheEvent>) -> Self {
        Self { receiver }
    }

    /// Subscribes a new logger to `pubsub`.
    pub async fn subscribe(pubsub: &dyn CachePubSub) -> catalog_core::cache::Result<Self> {
        Ok(Self::new(pubsub.subscribe().await?))
    }

    /// Spawns the logger on the runtime.
    pub fn spawn(self, shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<usize> {
        tokio::spawn(self.run(shutdown_rx))
    }

    /// Logs events until the event channel closes or shutdown is signalled.
    ///
    /// Returns the number of events logged.
    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) -> usize {
        let mut logged = 0;
        tracing::debug!("Cache event logger started");

        loop {
            tokio::select! {
                result = self.receiver.recv() => {
                    match result {
                        Ok(event) => {
                            tracing::info!(cache = %event.cache, "{}", format_event(&event));
                            logged += 1;
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "Cache event logger lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Cache event channel closed");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Cache event logger shutting down");
                    break;
                }
            }
        }

        logged
    }
}

/// Renders an event as `key | kind | old value | new value`.
///
/// Missing values render as `null`.
pub fn format_event(event: &CacheEvent) -> String {
    format!(
        "{} | {} | {} | {}",
        event.key,
        event.kind,
        event.old_value.as_deref().unwrap_or("null"),
        event.new_value.as_deref().unwrap_or("null"),
    )
}
