//! A cache namespace with its own TTL that reports every mutation.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::cache::{bytes_to_text, cache_key, Cache, CacheEvent, CacheLookup, CachePubSub};

/// A named cache over a shared `Cache` backend.
///
/// Every write, removal and observed expiry is published as a `CacheEvent`.
/// Backend failures are logged and treated as misses; they never reach
/// the caller.
#[derive(Clone)]
pub struct NamedCache {
    name: &'static str,
    cache: Arc<dyn Cache>,
    pubsub: Arc<dyn CachePubSub>,
    ttl: Option<Duration>,
}

impl NamedCache {
    /// Creates a named cache.
    ///
    /// # Arguments
    ///
    /// * `name` - Cache name, used to namespace keys and label events
    /// * `cache` - Backing store
    /// * `pubsub` - Sink for mutation events
    /// * `ttl` - Time-to-live applied to every write (`None` never expires)
    pub fn new(
        name: &'static str,
        cache: Arc<dyn Cache>,
        pubsub: Arc<dyn CachePubSub>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            name,
            cache,
            pubsub,
            ttl,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the live value under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.cache.get(&cache_key(self.name, key)).await {
            Ok(CacheLookup::Hit(value)) => {
                tracing::trace!(cache = self.name, key, "Cache hit");
                Some(value)
            }
            Ok(CacheLookup::Miss) => {
                tracing::trace!(cache = self.name, key, "Cache miss");
                None
            }
            Ok(CacheLookup::Expired(old)) => {
                tracing::trace!(cache = self.name, key, "Cache entry expired");
                self.publish(CacheEvent::expired(self.name, key, bytes_to_text(&old)))
                    .await;
                None
            }
            Err(err) => {
                tracing::warn!(cache = self.name, key, error = %err, "Cache lookup failed");
                None
            }
        }
    }

    /// Stores `value` under `key` with this cache's TTL.
    ///
    /// Returns false if the backend rejected the write.
    pub async fn put(&self, key: &str, value: &[u8]) -> bool {
        match self
            .cache
            .set(&cache_key(self.name, key), value, self.ttl)
            .await
        {
            Ok(previous) => {
                let old = previous.as_deref().map(bytes_to_text);
                self.publish(CacheEvent::stored(self.name, key, old, bytes_to_text(value)))
                    .await;
                true
            }
            Err(err) => {
                tracing::warn!(cache = self.name, key, error = %err, "Failed to write cache entry");
                false
            }
        }
    }

    /// Removes the value under `key`.
    ///
    /// Returns true if a live value was removed.
    pub async fn remove(&self, key: &str) -> bool {
        match self.cache.delete(&cache_key(self.name, key)).await {
            Ok(Some(old)) => {
                self.publish(CacheEvent::removed(self.name, key, bytes_to_text(&old)))
                    .await;
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(cache = self.name, key, error = %err, "Failed to remove cache entry");
                false
            }
        }
    }

    /// Drops every entry of the backing store.
    pub async fn clear(&self) {
        match self.cache.clear().await {
            Ok(removed) => tracing::debug!(cache = self.name, removed, "Cache cleared"),
            Err(err) => tracing::warn!(cache = self.name, error = %err, "Failed to clear cache"),
        }
    }

    async fn publish(&self, event: CacheEvent) {
        if let Err(err) = self.pubsub.publish(&event).await {
            tracing::warn!(cache = self.name, error = %err, "Failed to publish cache event");
        }
    }
}
