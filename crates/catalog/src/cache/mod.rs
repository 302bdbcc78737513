//! Product caches, their in-memory backend and the event logger.

mod logger;
pub mod memory;
mod named;
mod product;

pub use logger::{format_event, CacheEventLogger};
pub use named::NamedCache;
pub use product::{CacheTtls, ProductCache};

#[cfg(test)]
pub(crate) use product::tests::{product as test_product, MockProductRepository};
