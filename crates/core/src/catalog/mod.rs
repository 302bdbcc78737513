mod error;
mod mock_data;
mod operations;
mod sorting;
mod types;

pub use error::ProductError;
pub use mock_data::generate_seed_products;
pub use operations::{
    filter_products, product_stats, validate_product, CODE_SEPARATOR, MAX_DESCRIPTION_LEN,
    MIN_CODE_LEN, MIN_NAME_LEN, PRICE_RANGE, RATING_RANGE,
};
pub use sorting::{compare_by_id, compare_by_name, sort_by_id, sort_by_name, sort_products};
pub use types::{format_decimal, Product, SortOrder, RELEASE_DATE_FORMAT};
