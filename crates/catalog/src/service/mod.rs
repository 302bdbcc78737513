mod error;
mod product;

pub use error::{Result, ServiceError};
pub use product::ProductService;
