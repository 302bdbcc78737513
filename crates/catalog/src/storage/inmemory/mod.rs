//! In-memory storage backend.
//!
//! Stores products in a `HashMap` wrapped in `Arc<RwLock<_>>`. Nothing is
//! persisted; the catalog is lost when the process exits.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! let stored = repo.create_product(&product).await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
