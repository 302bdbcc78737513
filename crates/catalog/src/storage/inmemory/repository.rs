//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_core::catalog::{filter_products, sort_by_id, Product};
use catalog_core::storage::{ProductRepository, RepositoryError, Result};

/// In-memory product store.
///
/// Identities are assigned from a counter starting at 1 and are never
/// reused, mirroring an auto-increment column.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    products: Arc<RwLock<HashMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut listed: Vec<Product> = products.values().cloned().collect();
        sort_by_id(&mut listed);
        Ok(listed)
    }

    async fn create_product(&self, product: &Product) -> Result<Product> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = product.clone().with_id(id);

        let mut products = self.products.write().await;
        products.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let id = product
            .id
            .ok_or_else(|| RepositoryError::InvalidData("Product has no id".to_string()))?;

        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(())
            }
            None => Err(RepositoryError::product_not_found(id)),
        }
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        let mut products = self.products.write().await;
        if products.remove(&id).is_none() {
            return Err(RepositoryError::product_not_found(id));
        }
        Ok(())
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        let products = self.list_products().await?;
        Ok(filter_products(&products, term).into_iter().cloned().collect())
    }

    async fn count_products(&self) -> Result<u64> {
        let products = self.products.read().await;
        Ok(products.len() as u64)
    }
}
