use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::events::CacheEvent;
use super::Result;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A live value was found.
    Hit(Vec<u8>),
    /// No value is stored under the key.
    Miss,
    /// A value was stored but its TTL had passed; it has been dropped.
    Expired(Vec<u8>),
}

impl CacheLookup {
    /// Returns the live value, if any.
    pub fn into_value(self) -> Option<Vec<u8>> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Expired(_) => None,
        }
    }
}

/// Trait for basic cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Looks up a value by key, dropping it if it has expired.
    async fn get(&self, key: &str) -> Result<CacheLookup>;

    /// Sets a value with an optional TTL, returning the live value it replaced.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>)
        -> Result<Option<Vec<u8>>>;

    /// Deletes a value by key, returning it if it was live.
    async fn delete(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Drops every entry, returning how many were removed.
    async fn clear(&self) -> Result<usize>;
}

/// Trait for cache event pub/sub.
#[async_trait]
pub trait CachePubSub: Send + Sync {
    /// Publishes a cache event to every subscriber.
    async fn publish(&self, event: &CacheEvent) -> Result<()>;

    /// Subscribes to cache events.
    async fn subscribe(&self) -> Result<broadcast::Receiver<CacheEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_value() {
        assert_eq!(CacheLookup::Hit(b"v".to_vec()).into_value(), Some(b"v".to_vec()));
        assert_eq!(CacheLookup::Miss.into_value(), None);
        assert_eq!(CacheLookup::Expired(b"v".to_vec()).into_value(), None);
    }
}
