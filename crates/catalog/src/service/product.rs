//! Product service: the cached read path and the invalidating write path.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog_core::catalog::{product_stats, sort_products, validate_product, Product, SortOrder};
use catalog_core::storage::ProductRepository;

use super::error::{Result, ServiceError};
use crate::cache::ProductCache;

/// Product operations over a repository and the shared product caches.
///
/// - **Reads**: the full listing is served from `findAllCache`.
/// - **Writes**: persist, invalidate the listing, then record the product
///   in `updateCache` or `deleteCache`.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    cache: Arc<ProductCache>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, cache: Arc<ProductCache>) -> Self {
        Self { repository, cache }
    }

    pub fn cache(&self) -> &Arc<ProductCache> {
        &self.cache
    }

    /// Returns every product, from cache when the listing is still live.
    pub async fn find_all_products(&self) -> Result<Vec<Product>> {
        Ok(self.cache.get_all().await?)
    }

    /// Returns every product sorted by `order`.
    pub async fn find_all_sorted(&self, order: SortOrder) -> Result<Vec<Product>> {
        let mut products = self.find_all_products().await?;
        sort_products(&mut products, order);
        Ok(products)
    }

    pub async fn find_product_by_id(&self, id: i64) -> Result<Product> {
        self.repository
            .get_product(id)
            .await?
            .ok_or(ServiceError::NotFound { id })
    }

    /// Updates an already persisted product.
    pub async fn update_product(&self, product: &Product) -> Result<Product> {
        let id = persisted_id(product)?;
        validate_product(product)?;

        self.repository
            .update_product(product)
            .await
            .map_err(|err| ServiceError::from_repository(err, id))?;
        self.cache.invalidate_all().await;

        tracing::debug!(product_id = id, "Product updated");
        Ok(self.cache.put_updated(product).await)
    }

    /// Deletes a persisted product and returns the deleted record.
    pub async fn delete_product(&self, product: &Product) -> Result<Product> {
        let id = persisted_id(product)?;

        let stored = self.find_product_by_id(id).await?;
        self.repository
            .delete_product(id)
            .await
            .map_err(|err| ServiceError::from_repository(err, id))?;
        self.cache.invalidate_all().await;
        self.cache.forget_updated(id).await;

        tracing::debug!(product_id = id, "Product deleted");
        Ok(self.cache.put_deleted(&stored).await)
    }

    /// Inserts a new product or updates a persisted one.
    pub async fn save(&self, product: &Product) -> Result<Product> {
        if product.is_persisted() {
            return self.update_product(product).await;
        }

        validate_product(product)?;
        let stored = self.repository.create_product(product).await?;
        self.cache.invalidate_all().await;

        tracing::debug!(product_id = ?stored.id, name = %stored.name, "Product created");
        Ok(stored)
    }

    /// Searches products by free text.
    ///
    /// `None` or an empty term returns every product.
    pub async fn find_filter_products(&self, text: Option<&str>) -> Result<Vec<Product>> {
        match text {
            Some(term) if !term.is_empty() => Ok(self.repository.search_products(term).await?),
            _ => self.find_all_products().await,
        }
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.repository.count_products().await?)
    }

    /// Returns the number of products carrying each name.
    pub async fn get_stats(&self) -> Result<BTreeMap<String, usize>> {
        let products = self.find_all_products().await?;
        Ok(product_stats(&products))
    }
}

fn persisted_id(product: &Product) -> Result<i64> {
    product
        .id
        .ok_or_else(|| ServiceError::InvalidInput("product has not been saved".to_string()))
}
