//! Shared application state.
//!
//! Wires the selected storage backend, the product caches, the cache event
//! channel and the background tasks together. The storage backend is chosen
//! via feature flags (see `crate::storage`).

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use catalog_core::cache::CachePubSub;
use catalog_core::catalog::generate_seed_products;
use catalog_core::storage::ProductRepository;

use crate::cache::memory::MemoryPubSub;
use crate::cache::{CacheEventLogger, ProductCache};
use crate::config::Config;
use crate::refresh::{RefreshPeriods, Refresher};
use crate::service::ProductService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Product operations over the cached repository.
    pub service: ProductService,
    /// Cache pub/sub carrying every cache mutation.
    pub cache_pubsub: Arc<dyn CachePubSub>,
    /// Shutdown signal sender for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
    refresh_periods: RefreshPeriods,
    seed_demo_data: bool,
}

/// Handles of the tasks started by `AppState::start_background_tasks`.
pub struct BackgroundTasks {
    logger: JoinHandle<usize>,
    refreshers: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Waits for every task to stop and returns the number of logged events.
    pub async fn join(self) -> usize {
        for handle in self.refreshers {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "Refresh task ended abnormally");
            }
        }
        match self.logger.await {
            Ok(logged) => logged,
            Err(err) => {
                tracing::warn!(error = %err, "Cache event logger ended abnormally");
                0
            }
        }
    }
}

impl AppState {
    /// Creates an AppState over `repository` using the given configuration.
    fn build(repository: Arc<dyn ProductRepository>, config: &Config) -> anyhow::Result<Self> {
        let cache_pubsub: Arc<dyn CachePubSub> =
            Arc::new(MemoryPubSub::new(config.event_channel_capacity));
        let cache = ProductCache::in_memory(
            repository.clone(),
            cache_pubsub.clone(),
            config.cache_ttls(),
            config.cache_max_entries,
        )?;
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            service: ProductService::new(repository, Arc::new(cache)),
            cache_pubsub,
            shutdown_tx,
            refresh_periods: config.refresh_periods(),
            seed_demo_data: config.seed_demo_data,
        })
    }

    /// Seeds the demo catalog if enabled and the store is empty.
    ///
    /// Returns the number of products inserted.
    pub async fn seed_demo_data(&self) -> anyhow::Result<usize> {
        if !self.seed_demo_data || self.service.count().await? > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for product in generate_seed_products() {
            self.service.save(&product).await?;
            inserted += 1;
        }
        tracing::info!(count = inserted, "Seeded demo catalog");
        Ok(inserted)
    }

    /// Starts the cache event logger and the refresh jobs.
    ///
    /// Both stop on `signal_shutdown`.
    pub async fn start_background_tasks(&self) -> anyhow::Result<BackgroundTasks> {
        let logger = CacheEventLogger::subscribe(self.cache_pubsub.as_ref())
            .await?
            .spawn(self.subscribe_shutdown());
        let refreshers = Refresher::new(self.service.cache().clone(), self.refresh_periods)
            .spawn(&self.shutdown_tx);

        Ok(BackgroundTasks { logger, refreshers })
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all background tasks to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Factory functions for each storage backend
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config) -> anyhow::Result<Self> {
            let repository = Arc::new(InMemoryRepository::new());
            Self::build(repository, config)
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage.
        pub async fn new(config: &Config) -> anyhow::Result<Self> {
            tracing::debug!(path = %config.sqlite_path, "Opening SQLite database");
            let repository = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            Self::build(repository, config)
        }
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            refresh_all_period_ms: 20,
            refresh_updated_period_ms: 20,
            refresh_deleted_period_ms: 20,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_seed_demo_data_once() {
        let state = AppState::new(&test_config()).await.unwrap();

        assert_eq!(state.seed_demo_data().await.unwrap(), 5);
        assert_eq!(state.seed_demo_data().await.unwrap(), 0);
        assert_eq!(state.service.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_seed_demo_data_disabled() {
        let config = Config {
            seed_demo_data: false,
            ..test_config()
        };
        let state = AppState::new(&config).await.unwrap();

        assert_eq!(state.seed_demo_data().await.unwrap(), 0);
        assert_eq!(state.service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_background_tasks_log_and_stop() {
        let state = AppState::new(&test_config()).await.unwrap();
        state.seed_demo_data().await.unwrap();

        let tasks = state.start_background_tasks().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        state.signal_shutdown();

        let logged = tokio::time::timeout(Duration::from_secs(1), tasks.join())
            .await
            .unwrap();

        // The listing refresh writes `ALL` on every run.
        assert!(logged >= 1);
    }

    #[tokio::test]
    async fn test_zero_cache_capacity_is_rejected() {
        let config = Config {
            cache_max_entries: 0,
            ..test_config()
        };

        assert!(AppState::new(&config).await.is_err());
    }
}
