//! SQLite repository implementation.
//!
//! Implements `ProductRepository` from `catalog_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use catalog_core::catalog::Product;
use catalog_core::storage::{ProductRepository, RepositoryError, Result};

use super::conversions::{format_date, row_to_product};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based product repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn query_products(&self, sql: &'static str, term: Option<String>) -> Result<Vec<Product>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = match &term {
                    Some(term) => stmt.query_map([term], row_to_product),
                    None => stmt.query_map([], row_to_product),
                }
                .map_err(wrap_err)?;

                let mut products = Vec::new();
                for row_result in rows {
                    products.push(row_result.map_err(wrap_err)?);
                }
                Ok(products)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl ProductRepository for SqliteRepository {
    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PRODUCT_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_product) {
                    Ok(product) => Ok(Some(product)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.query_products(schema::SELECT_ALL_PRODUCTS, None).await
    }

    async fn create_product(&self, product: &Product) -> Result<Product> {
        let name = product.name.clone();
        let code = product.code.clone();
        let description = product.description.clone();
        let release_date = format_date(&product.release_date);
        let price = product.price;
        let star_rating = product.star_rating;
        let image_url = product.image_url.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PRODUCT,
                    rusqlite::params![
                        name,
                        code,
                        description,
                        release_date,
                        price,
                        star_rating,
                        image_url
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        tracing::trace!(product_id = id, "Product inserted");
        Ok(product.clone().with_id(id))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let id = product
            .id
            .ok_or_else(|| RepositoryError::InvalidData("Product has no id".to_string()))?;
        let name = product.name.clone();
        let code = product.code.clone();
        let description = product.description.clone();
        let release_date = format_date(&product.release_date);
        let price = product.price;
        let star_rating = product.star_rating;
        let image_url = product.image_url.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_PRODUCT,
                        rusqlite::params![
                            id,
                            name,
                            code,
                            description,
                            release_date,
                            price,
                            star_rating,
                            image_url
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_PRODUCT, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id))
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        self.query_products(schema::SEARCH_PRODUCTS, Some(term.to_string()))
            .await
    }

    async fn count_products(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .call(|conn| {
                conn.query_row(schema::COUNT_PRODUCTS, [], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        u64::try_from(count).map_err(|e| RepositoryError::InvalidData(e.to_string()))
    }
}
