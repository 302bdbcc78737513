//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with per-entry TTL using
//! tokio synchronization primitives and an LRU eviction policy.
//!
//! Expired entries are dropped lazily: the first lookup that finds an entry
//! past its TTL removes it and reports it as `CacheLookup::Expired`.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use catalog_core::cache::{Cache, CacheError, CacheLookup, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }

    /// Returns the value if the entry is still live.
    fn into_live_value(self) -> Option<Vec<u8>> {
        if self.is_expired() {
            None
        } else {
            Some(self.value)
        }
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Every value is replaced whole while the write lock is held, so readers
/// observe either the previous or the new value.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache with LRU eviction.
    ///
    /// # Arguments
    ///
    /// * `max_entries` - Maximum number of entries before LRU eviction kicks in.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            CacheError::OperationFailed("max_entries must be > 0".to_string())
        })?;
        Ok(Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        })
    }

    /// Returns the number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<CacheLookup> {
        // LruCache::get promotes the entry, which needs the write lock.
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(CacheLookup::Hit(entry.value.clone())),
            Some(_) => {}
            None => return Ok(CacheLookup::Miss),
        }

        let expired = store.pop(key).map(|e| e.value).unwrap_or_default();
        Ok(CacheLookup::Expired(expired))
    }

    async fn set(
        &self,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;
        let entry = CacheEntry::new(value.to_vec(), ttl);
        let previous = store.put(key.to_string(), entry);
        Ok(previous.and_then(CacheEntry::into_live_value))
    }

    async fn delete(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;
        Ok(store.pop(key).and_then(CacheEntry::into_live_value))
    }

    async fn clear(&self) -> Result<usize> {
        let mut store = self.store.write().await;
        let removed = store.len();
        store.clear();
        Ok(removed)
    }
}
