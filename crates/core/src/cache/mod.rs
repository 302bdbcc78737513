mod error;
mod events;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use events::{CacheEvent, CacheEventKind};
pub use keys::{
    cache_key, ALL_KEY, DELETED_KEY, DELETE_CACHE, FIND_ALL_CACHE, UPDATED_KEY, UPDATE_CACHE,
};
pub use serialization::{
    bytes_to_text, deserialize_product, deserialize_products, serialize_product,
    serialize_products, SerializationError,
};
pub use traits::{Cache, CacheLookup, CachePubSub};
