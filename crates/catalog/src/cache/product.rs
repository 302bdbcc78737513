//! The three product caches and their read-through / write-through logic.
//!
//! - `findAllCache` / `ALL`: the full product listing, read-through.
//! - `updateCache` / `UPDATED`: the most recently updated product.
//! - `deleteCache` / `DELETED`: the most recently deleted product.
//!
//! Every write to the store invalidates `ALL`, so a listing never outlives
//! a write that happened after it was loaded. The single-value caches are
//! written under their own lock, and a refresh only writes back if the entry
//! is still the one it read before going to the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use catalog_core::cache::{
    deserialize_product, deserialize_products, serialize_product, serialize_products, CachePubSub,
    ALL_KEY, DELETED_KEY, DELETE_CACHE, FIND_ALL_CACHE, UPDATED_KEY, UPDATE_CACHE,
};
use catalog_core::catalog::Product;
use catalog_core::storage::{ProductRepository, Result};

use super::memory::MemoryCache;
use super::named::NamedCache;

/// Time-to-live of each named cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub find_all: Duration,
    pub updated: Duration,
    pub deleted: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            find_all: Duration::from_secs(10),
            updated: Duration::from_secs(3),
            deleted: Duration::from_secs(1),
        }
    }
}

/// Shared product caches, created once at startup.
pub struct ProductCache {
    repository: Arc<dyn ProductRepository>,
    find_all: NamedCache,
    updated: NamedCache,
    deleted: NamedCache,
    /// Serializes full-scan loads so concurrent misses trigger one store call.
    load_lock: Mutex<()>,
    /// Bumped on every invalidation of `ALL`. A load only stores its result
    /// if no invalidation happened while it was reading the store.
    generation: Mutex<u64>,
    updated_lock: Mutex<()>,
    deleted_lock: Mutex<()>,
}

impl ProductCache {
    /// Creates the product caches over explicit named caches.
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        find_all: NamedCache,
        updated: NamedCache,
        deleted: NamedCache,
    ) -> Self {
        Self {
            repository,
            find_all,
            updated,
            deleted,
            load_lock: Mutex::new(()),
            generation: Mutex::new(0),
            updated_lock: Mutex::new(()),
            deleted_lock: Mutex::new(()),
        }
    }

    /// Creates the product caches, each backed by its own `MemoryCache`.
    pub fn in_memory(
        repository: Arc<dyn ProductRepository>,
        pubsub: Arc<dyn CachePubSub>,
        ttls: CacheTtls,
        max_entries: usize,
    ) -> catalog_core::cache::Result<Self> {
        let named = |name: &'static str, ttl: Duration| -> catalog_core::cache::Result<NamedCache> {
            let backend = Arc::new(MemoryCache::new(max_entries)?);
            Ok(NamedCache::new(name, backend, pubsub.clone(), Some(ttl)))
        };

        Ok(Self::new(
            repository,
            named(FIND_ALL_CACHE, ttls.find_all)?,
            named(UPDATE_CACHE, ttls.updated)?,
            named(DELETE_CACHE, ttls.deleted)?,
        ))
    }

    /// Returns the full product listing, loading it on a miss.
    pub async fn get_all(&self) -> Result<Vec<Product>> {
        if let Some(products) = self.cached_all().await {
            return Ok(products);
        }

        let _load = self.load_lock.lock().await;

        // Another caller may have loaded while we waited.
        if let Some(products) = self.cached_all().await {
            return Ok(products);
        }

        self.load_all().await
    }

    /// Reloads the full product listing regardless of what is cached.
    pub async fn refresh_all(&self) -> Result<Vec<Product>> {
        let _load = self.load_lock.lock().await;
        self.load_all().await
    }

    /// Drops the cached listing so the next read goes to the store.
    pub async fn invalidate_all(&self) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.find_all.remove(ALL_KEY).await;
        tracing::trace!(generation = *generation, "Product listing invalidated");
    }

    /// Records `product` as the most recently updated product.
    pub async fn put_updated(&self, product: &Product) -> Product {
        let _write = self.updated_lock.lock().await;
        Self::put_product(&self.updated, UPDATED_KEY, product).await;
        product.clone()
    }

    /// Records `product` as the most recently deleted product.
    pub async fn put_deleted(&self, product: &Product) -> Product {
        let _write = self.deleted_lock.lock().await;
        Self::put_product(&self.deleted, DELETED_KEY, product).await;
        product.clone()
    }

    /// Returns the most recently updated product, if still cached.
    pub async fn last_updated(&self) -> Option<Product> {
        Self::get_product(&self.updated, UPDATED_KEY).await
    }

    /// Returns the most recently deleted product, if still cached.
    pub async fn last_deleted(&self) -> Option<Product> {
        Self::get_product(&self.deleted, DELETED_KEY).await
    }

    /// Forgets the most recently updated product if it is product `id`.
    pub async fn forget_updated(&self, id: i64) -> bool {
        let _write = self.updated_lock.lock().await;
        match self.last_updated().await {
            Some(updated) if updated.id == Some(id) => self.updated.remove(UPDATED_KEY).await,
            _ => false,
        }
    }

    /// Re-reads the cached `UPDATED` product from the store.
    ///
    /// The entry is rewritten when the stored copy differs and dropped when
    /// the product no longer exists. Nothing is written if the entry was
    /// replaced or removed while the store was being read.
    pub async fn refresh_updated(&self) -> Result<()> {
        let Some(cached) = self.last_updated().await else {
            return Ok(());
        };
        let fresh = match cached.id {
            Some(id) => self.repository.get_product(id).await?,
            None => None,
        };

        let _write = self.updated_lock.lock().await;
        if self.last_updated().await.as_ref() != Some(&cached) {
            tracing::debug!(cache = UPDATE_CACHE, "Entry changed during refresh; keeping it");
            return Ok(());
        }

        match fresh {
            Some(fresh) if fresh != cached => {
                Self::put_product(&self.updated, UPDATED_KEY, &fresh).await;
            }
            Some(_) => {}
            None => {
                self.updated.remove(UPDATED_KEY).await;
            }
        }
        Ok(())
    }

    /// Drops the cached `DELETED` product if its id exists in the store again.
    ///
    /// Both stores hand out ids that are never reused, so only a row written
    /// by another process under the same id triggers the drop.
    pub async fn refresh_deleted(&self) -> Result<()> {
        let Some(cached) = self.last_deleted().await else {
            return Ok(());
        };
        let Some(id) = cached.id else {
            return Ok(());
        };
        let present = self.repository.get_product(id).await?.is_some();

        let _write = self.deleted_lock.lock().await;
        if self.last_deleted().await.as_ref() != Some(&cached) {
            tracing::debug!(cache = DELETE_CACHE, "Entry changed during refresh; keeping it");
            return Ok(());
        }

        if present {
            tracing::debug!(product_id = id, "Deleted product is back in the store");
            self.deleted.remove(DELETED_KEY).await;
        } else {
            tracing::trace!(product_id = id, "Deleted product still absent");
        }
        Ok(())
    }

    /// Drops every entry from all three caches.
    pub async fn clear(&self) {
        {
            let mut generation = self.generation.lock().await;
            *generation += 1;
        }
        self.find_all.clear().await;

        let _updated = self.updated_lock.lock().await;
        let _deleted = self.deleted_lock.lock().await;
        self.updated.clear().await;
        self.deleted.clear().await;
    }

    async fn cached_all(&self) -> Option<Vec<Product>> {
        let bytes = self.find_all.get(ALL_KEY).await?;
        match deserialize_products(&bytes) {
            Ok(products) => Some(products),
            Err(err) => {
                // Deserialization failed - treat as cache miss
                tracing::warn!(error = %err, "Cached product listing is unreadable");
                None
            }
        }
    }

    /// Reads the full scan from the store and caches it.
    ///
    /// Callers must hold `load_lock`.
    async fn load_all(&self) -> Result<Vec<Product>> {
        let observed = *self.generation.lock().await;
        let products = self.repository.list_products().await?;

        let generation = self.generation.lock().await;
        if *generation != observed {
            tracing::debug!(
                observed,
                current = *generation,
                "Product listing invalidated during load; not caching"
            );
            return Ok(products);
        }

        match serialize_products(&products) {
            Ok(bytes) => {
                self.find_all.put(ALL_KEY, &bytes).await;
                tracing::debug!(count = products.len(), "Product listing cached");
            }
            Err(err) => tracing::warn!(error = %err, "Failed to serialize product listing"),
        }
        drop(generation);

        Ok(products)
    }

    async fn put_product(cache: &NamedCache, key: &str, product: &Product) {
        match serialize_product(product) {
            Ok(bytes) => {
                cache.put(key, &bytes).await;
            }
            Err(err) => {
                tracing::warn!(cache = cache.name(), key, error = %err, "Failed to serialize product")
            }
        }
    }

    async fn get_product(cache: &NamedCache, key: &str) -> Option<Product> {
        let bytes = cache.get(key).await?;
        match deserialize_product(&bytes) {
            Ok(product) => Some(product),
            Err(err) => {
                tracing::warn!(cache = cache.name(), key, error = %err, "Cached product is unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::RwLock;

    use crate::cache::memory::MemoryPubSub;
    use catalog_core::cache::{CacheEvent, CacheEventKind};
    use catalog_core::storage::RepositoryError;

    /// Repository that counts full scans and can stall them.
    pub(crate) struct MockProductRepository {
        products: RwLock<BTreeMap<i64, Product>>,
        next_id: AtomicUsize,
        pub list_calls: AtomicUsize,
        pub get_calls: AtomicUsize,
        list_delay: Option<Duration>,
        get_delay: Option<Duration>,
    }

    impl MockProductRepository {
        pub(crate) fn new() -> Self {
            Self {
                products: RwLock::new(BTreeMap::new()),
                next_id: AtomicUsize::new(1),
                list_calls: AtomicUsize::new(0),
                get_calls: AtomicUsize::new(0),
                list_delay: None,
                get_delay: None,
            }
        }

        pub(crate) fn with_list_delay(mut self, delay: Duration) -> Self {
            self.list_delay = Some(delay);
            self
        }

        pub(crate) fn with_get_delay(mut self, delay: Duration) -> Self {
            self.get_delay = Some(delay);
            self
        }

        pub(crate) fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn get_product(&self, id: i64) -> Result<Option<Product>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            let found = self.products.read().await.get(&id).cloned();
            if let Some(delay) = self.get_delay {
                tokio::time::sleep(delay).await;
            }
            Ok(found)
        }

        async fn list_products(&self) -> Result<Vec<Product>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let snapshot: Vec<Product> = self.products.read().await.values().cloned().collect();
            if let Some(delay) = self.list_delay {
                tokio::time::sleep(delay).await;
            }
            Ok(snapshot)
        }

        async fn create_product(&self, product: &Product) -> Result<Product> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
            let stored = product.clone().with_id(id);
            self.products.write().await.insert(id, stored.clone());
            Ok(stored)
        }

        async fn update_product(&self, product: &Product) -> Result<()> {
            let id = product
                .id
                .ok_or_else(|| RepositoryError::InvalidData("product has no id".to_string()))?;
            let mut products = self.products.write().await;
            if !products.contains_key(&id) {
                return Err(RepositoryError::product_not_found(id));
            }
            products.insert(id, product.clone());
            Ok(())
        }

        async fn delete_product(&self, id: i64) -> Result<()> {
            if self.products.write().await.remove(&id).is_none() {
                return Err(RepositoryError::product_not_found(id));
            }
            Ok(())
        }

        async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
            Ok(self
                .products
                .read()
                .await
                .values()
                .filter(|p| p.matches_search(term))
                .cloned()
                .collect())
        }

        async fn count_products(&self) -> Result<u64> {
            Ok(self.products.read().await.len() as u64)
        }
    }

    pub(crate) fn product(name: &str, code: &str) -> Product {
        Product::new(
            name,
            code,
            "Test product",
            NaiveDate::from_ymd_opt(2021, 5, 21).unwrap(),
            10.0,
            4.0,
            "assets/images/test.png",
        )
    }

    pub(crate) fn short_ttls() -> CacheTtls {
        CacheTtls {
            find_all: Duration::from_millis(80),
            updated: Duration::from_millis(80),
            deleted: Duration::from_millis(80),
        }
    }

    fn setup(
        repo: MockProductRepository,
        ttls: CacheTtls,
    ) -> (Arc<MockProductRepository>, ProductCache, MemoryPubSub) {
        let repo = Arc::new(repo);
        let pubsub = MemoryPubSub::default();
        let cache =
            ProductCache::in_memory(repo.clone(), Arc::new(pubsub.clone()), ttls, 4).unwrap();
        (repo, cache, pubsub)
    }

    #[tokio::test]
    async fn test_get_all_within_ttl_hits_cache() {
        let (repo, cache, _) = setup(MockProductRepository::new(), short_ttls());
        repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();

        let first = cache.get_all().await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = cache.get_all().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_all_after_ttl_reloads() {
        let (repo, cache, _) = setup(MockProductRepository::new(), short_ttls());
        repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();

        cache.get_all().await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        cache.get_all().await.unwrap();

        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_reload() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());

        assert!(cache.get_all().await.unwrap().is_empty());
        repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();

        // Still served from cache until invalidated
        assert!(cache.get_all().await.unwrap().is_empty());

        cache.invalidate_all().await;
        assert_eq!(cache.get_all().await.unwrap().len(), 1);
        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_load_once() {
        let repo = MockProductRepository::new().with_list_delay(Duration::from_millis(30));
        let (repo, cache, _) = setup(repo, CacheTtls::default());
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_all().await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_racing_invalidation_is_not_cached() {
        let repo = MockProductRepository::new().with_list_delay(Duration::from_millis(50));
        let (repo, cache, _) = setup(repo, CacheTtls::default());
        let cache = Arc::new(cache);

        let loader = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_all().await.unwrap() })
        };

        // Write lands while the loader is reading its (now stale) snapshot.
        tokio::time::sleep(Duration::from_millis(10)).await;
        repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();
        cache.invalidate_all().await;

        let stale = loader.await.unwrap();
        assert!(stale.is_empty());

        // The stale snapshot was not cached, so the next read sees the write.
        let fresh = cache.get_all().await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_all_reloads_while_cached() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());

        cache.get_all().await.unwrap();
        repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();
        cache.refresh_all().await.unwrap();

        assert_eq!(cache.get_all().await.unwrap().len(), 1);
        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_put_and_read_single_value_caches() {
        let (_, cache, pubsub) = setup(MockProductRepository::new(), CacheTtls::default());
        let mut events = pubsub.subscribe().await.unwrap();
        let updated = product("Hammer", "TBX-0048").with_id(1);
        let deleted = product("Saw", "TBX-0022").with_id(2);

        assert_eq!(cache.put_updated(&updated).await, updated);
        assert_eq!(cache.put_deleted(&deleted).await, deleted);

        assert_eq!(cache.last_updated().await, Some(updated));
        assert_eq!(cache.last_deleted().await, Some(deleted));

        let first: CacheEvent = events.recv().await.unwrap();
        assert_eq!((first.cache.as_str(), first.key.as_str()), (UPDATE_CACHE, UPDATED_KEY));
        let second = events.recv().await.unwrap();
        assert_eq!((second.cache.as_str(), second.key.as_str()), (DELETE_CACHE, DELETED_KEY));
    }

    #[tokio::test]
    async fn test_single_value_caches_expire() {
        let (_, cache, _) = setup(MockProductRepository::new(), short_ttls());
        cache.put_updated(&product("Hammer", "TBX-0048").with_id(1)).await;

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.last_updated().await, None);
    }

    #[tokio::test]
    async fn test_refresh_updated_rewrites_changed_product() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());
        let stored = repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();
        cache.put_updated(&stored).await;

        let mut renamed = stored.clone();
        renamed.name = "Claw Hammer".to_string();
        repo.update_product(&renamed).await.unwrap();

        cache.refresh_updated().await.unwrap();

        assert_eq!(cache.last_updated().await, Some(renamed));
    }

    #[tokio::test]
    async fn test_refresh_updated_leaves_unchanged_product() {
        let (repo, cache, pubsub) = setup(MockProductRepository::new(), CacheTtls::default());
        let stored = repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();
        cache.put_updated(&stored).await;
        let mut events = pubsub.subscribe().await.unwrap();

        cache.refresh_updated().await.unwrap();

        assert!(events.try_recv().is_err());
        assert_eq!(cache.last_updated().await, Some(stored));
    }

    #[tokio::test]
    async fn test_refresh_updated_drops_vanished_product() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());
        let stored = repo.create_product(&product("Hammer", "TBX-0048")).await.unwrap();
        cache.put_updated(&stored).await;
        repo.delete_product(stored.id.unwrap()).await.unwrap();

        cache.refresh_updated().await.unwrap();

        assert_eq!(cache.last_updated().await, None);
    }

    #[tokio::test]
    async fn test_refresh_updated_without_entry_skips_store() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());

        cache.refresh_updated().await.unwrap();
        cache.refresh_deleted().await.unwrap();

        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_deleted_drops_resurrected_product() {
        let (repo, cache, pubsub) = setup(MockProductRepository::new(), CacheTtls::default());
        let stored = repo.create_product(&product("Saw", "TBX-0022")).await.unwrap();
        cache.put_deleted(&stored).await;

        // Still present in the store, e.g. deleted then restored
        let mut events = pubsub.subscribe().await.unwrap();
        cache.refresh_deleted().await.unwrap();

        assert_eq!(cache.last_deleted().await, None);
        assert_eq!(events.recv().await.unwrap().kind, CacheEventKind::Removed);
    }

    #[tokio::test]
    async fn test_refresh_deleted_keeps_absent_product() {
        let (_, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());
        let gone = product("Saw", "TBX-0022").with_id(99);
        cache.put_deleted(&gone).await;

        cache.refresh_deleted().await.unwrap();

        assert_eq!(cache.last_deleted().await, Some(gone));
    }

    /// Stores `name` and caches it as `UPDATED`, then renames it in the store.
    async fn updated_then_renamed(
        repo: &MockProductRepository,
        cache: &ProductCache,
        name: &str,
    ) {
        let stored = repo.create_product(&product(name, "TBX-0048")).await.unwrap();
        cache.put_updated(&stored).await;
        let mut renamed = stored.clone();
        renamed.name = format!("Claw {name}");
        repo.update_product(&renamed).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_updated_keeps_entry_written_meanwhile() {
        let repo = MockProductRepository::new().with_get_delay(Duration::from_millis(50));
        let (repo, cache, _) = setup(repo, CacheTtls::default());
        let cache = Arc::new(cache);
        updated_then_renamed(&repo, &cache, "Hammer").await;

        let refresh = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.refresh_updated().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let saw = product("Saw", "TBX-0022").with_id(2);
        cache.put_updated(&saw).await;
        refresh.await.unwrap().unwrap();

        assert_eq!(cache.last_updated().await, Some(saw));
    }

    #[tokio::test]
    async fn test_refresh_updated_does_not_restore_forgotten_entry() {
        let repo = MockProductRepository::new().with_get_delay(Duration::from_millis(50));
        let (repo, cache, _) = setup(repo, CacheTtls::default());
        let cache = Arc::new(cache);
        updated_then_renamed(&repo, &cache, "Hammer").await;

        let refresh = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.refresh_updated().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.forget_updated(1).await);
        refresh.await.unwrap().unwrap();

        assert_eq!(cache.last_updated().await, None);
    }

    #[tokio::test]
    async fn test_refresh_updated_does_not_write_after_clear() {
        let repo = MockProductRepository::new().with_get_delay(Duration::from_millis(50));
        let (repo, cache, _) = setup(repo, CacheTtls::default());
        let cache = Arc::new(cache);
        updated_then_renamed(&repo, &cache, "Hammer").await;

        let refresh = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.refresh_updated().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.clear().await;
        refresh.await.unwrap().unwrap();

        assert_eq!(cache.last_updated().await, None);
    }

    #[tokio::test]
    async fn test_refresh_deleted_keeps_entry_written_meanwhile() {
        let repo = MockProductRepository::new().with_get_delay(Duration::from_millis(50));
        let (repo, cache, _) = setup(repo, CacheTtls::default());
        let cache = Arc::new(cache);
        let restored = repo.create_product(&product("Saw", "TBX-0022")).await.unwrap();
        cache.put_deleted(&restored).await;

        let refresh = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.refresh_deleted().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let hammer = product("Hammer", "TBX-0048").with_id(7);
        cache.put_deleted(&hammer).await;
        refresh.await.unwrap().unwrap();

        assert_eq!(cache.last_deleted().await, Some(hammer));
    }

    #[tokio::test]
    async fn test_forget_updated_only_drops_matching_product() {
        let (_, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());
        let hammer = product("Hammer", "TBX-0048").with_id(1);
        cache.put_updated(&hammer).await;

        assert!(!cache.forget_updated(2).await);
        assert_eq!(cache.last_updated().await, Some(hammer));
        assert!(cache.forget_updated(1).await);
        assert_eq!(cache.last_updated().await, None);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());
        cache.get_all().await.unwrap();
        cache.put_updated(&product("Hammer", "TBX-0048").with_id(1)).await;
        cache.put_deleted(&product("Saw", "TBX-0022").with_id(2)).await;

        cache.clear().await;

        assert_eq!(cache.last_updated().await, None);
        assert_eq!(cache.last_deleted().await, None);
        cache.get_all().await.unwrap();
        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_never_exposes_torn_listing() {
        let (repo, cache, _) = setup(MockProductRepository::new(), CacheTtls::default());
        for i in 0..20 {
            repo.create_product(&product("Hammer", &format!("TBX-{i:04}")))
                .await
                .unwrap();
        }
        let cache = Arc::new(cache);

        let refresher = {
            let cache = cache.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    cache.refresh_all().await.unwrap();
                }
            })
        };

        for _ in 0..50 {
            let products = cache.get_all().await.unwrap();
            assert_eq!(products.len(), 20);
        }
        refresher.await.unwrap();
    }
}
