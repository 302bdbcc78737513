use async_trait::async_trait;

use crate::catalog::Product;

use super::Result;

/// Repository for product operations.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Gets a product by its ID.
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;

    /// Gets every stored product.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Inserts a new product and returns it with its assigned ID.
    ///
    /// Any ID already present on `product` is ignored.
    async fn create_product(&self, product: &Product) -> Result<Product>;

    /// Updates an existing product. Fails with `NotFound` when absent.
    async fn update_product(&self, product: &Product) -> Result<()>;

    /// Deletes a product by its ID. Fails with `NotFound` when absent.
    async fn delete_product(&self, id: i64) -> Result<()>;

    /// Case-insensitive substring search across name, code, release date,
    /// price, star rating and image URL.
    async fn search_products(&self, term: &str) -> Result<Vec<Product>>;

    /// Counts stored products.
    async fn count_products(&self) -> Result<u64>;
}
