//! Names and sentinel keys of the product caches.
//!
//! Each named cache holds a single entry under a fixed key, so only one
//! version of its value is resident at a time.

/// Cache holding the full product listing.
pub const FIND_ALL_CACHE: &str = "findAllCache";
/// Cache holding the most recently updated product.
pub const UPDATE_CACHE: &str = "updateCache";
/// Cache holding the most recently deleted product.
pub const DELETE_CACHE: &str = "deleteCache";

/// Key of the full product listing.
pub const ALL_KEY: &str = "ALL";
/// Key of the most recently updated product.
pub const UPDATED_KEY: &str = "UPDATED";
/// Key of the most recently deleted product.
pub const DELETED_KEY: &str = "DELETED";

/// Returns the storage key of a sentinel within a named cache.
///
/// Named caches may share one backing store, so keys are namespaced by
/// cache name.
pub fn cache_key(cache: &str, key: &str) -> String {
    format!("{cache}:{key}")
}
