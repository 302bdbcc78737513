//! In-memory pub/sub implementation.
//!
//! Fans cache events out to every subscriber using a tokio broadcast channel.

use async_trait::async_trait;
use tokio::sync::broadcast;

use catalog_core::cache::{CacheEvent, CachePubSub, Result};

/// Default channel capacity for pub/sub messages.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// In-memory pub/sub implementation.
///
/// Each subscriber holds its own `broadcast::Receiver`; a subscriber that
/// falls more than `capacity` events behind observes a `Lagged` error and
/// skips ahead.
#[derive(Debug, Clone)]
pub struct MemoryPubSub {
    sender: broadcast::Sender<CacheEvent>,
}

impl MemoryPubSub {
    /// Creates a new pub/sub instance with the given channel capacity.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of live subscribers.
    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MemoryPubSub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl CachePubSub for MemoryPubSub {
    async fn publish(&self, event: &CacheEvent) -> Result<()> {
        // No receivers just means nobody is listening.
        let _ = self.sender.send(event.clone());
        Ok(())
    }

    async fn subscribe(&self) -> Result<broadcast::Receiver<CacheEvent>> {
        Ok(self.sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::cache::CacheEventKind;

    fn event() -> CacheEvent {
        CacheEvent::stored("findAllCache", "ALL", None, "[]".to_string())
    }

    #[tokio::test]
    async fn test_publish_and_subscribe() {
        let pubsub = MemoryPubSub::default();
        let mut receiver = pubsub.subscribe().await.unwrap();

        pubsub.publish(&event()).await.unwrap();

        let received = receiver.recv().await.unwrap();
        assert_eq!(received, event());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let pubsub = MemoryPubSub::default();
        let mut receiver1 = pubsub.subscribe().await.unwrap();
        let mut receiver2 = pubsub.subscribe().await.unwrap();
        assert_eq!(pubsub.subscriber_count(), 2);

        pubsub.publish(&event()).await.unwrap();

        assert_eq!(receiver1.recv().await.unwrap().kind, CacheEventKind::Created);
        assert_eq!(receiver2.recv().await.unwrap().kind, CacheEventKind::Created);
    }

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let pubsub = MemoryPubSub::default();
        assert!(pubsub.publish(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let pubsub = MemoryPubSub::new(2);
        let mut receiver = pubsub.subscribe().await.unwrap();

        for _ in 0..5 {
            pubsub.publish(&event()).await.unwrap();
        }

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert!(receiver.recv().await.is_ok());
    }
}
