use std::collections::BTreeMap;

use super::error::ProductError;
use super::types::Product;

/// Minimum length of a product name.
pub const MIN_NAME_LEN: usize = 3;
/// Minimum length of a product code.
pub const MIN_CODE_LEN: usize = 6;
/// Separator every product code must contain.
pub const CODE_SEPARATOR: char = '-';
/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LEN: usize = 50;
/// Inclusive price bounds.
pub const PRICE_RANGE: (f64, f64) = (1.0, 10_000.0);
/// Inclusive star rating bounds.
pub const RATING_RANGE: (f64, f64) = (1.0, 5.0);

/// Validates a product before it is persisted.
///
/// Returns the first violated rule, checking fields in declaration order.
pub fn validate_product(product: &Product) -> Result<(), ProductError> {
    let name = product.name.trim();
    if name.is_empty() {
        return Err(ProductError::EmptyName);
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ProductError::NameTooShort);
    }

    let code = product.code.trim();
    if code.is_empty() {
        return Err(ProductError::EmptyCode);
    }
    if code.chars().count() < MIN_CODE_LEN || !code.contains(CODE_SEPARATOR) {
        return Err(ProductError::InvalidCode(product.code.clone()));
    }

    if product.description.trim().is_empty() {
        return Err(ProductError::EmptyDescription);
    }
    if product.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ProductError::DescriptionTooLong);
    }

    if !in_range(product.price, PRICE_RANGE) {
        return Err(ProductError::PriceOutOfRange(product.price));
    }
    if !in_range(product.star_rating, RATING_RANGE) {
        return Err(ProductError::RatingOutOfRange(product.star_rating));
    }

    if product.image_url.trim().is_empty() {
        return Err(ProductError::EmptyImageUrl);
    }
    if !product.image_url.contains(".png") {
        return Err(ProductError::InvalidImageUrl(product.image_url.clone()));
    }

    Ok(())
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value.is_finite() && value >= min && value <= max
}

/// Filters products by a free-text term.
///
/// An empty term returns every product.
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| product.matches_search(term))
        .collect()
}

/// Counts products per name, for the dashboard breakdown.
pub fn product_stats(products: &[Product]) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for product in products {
        *stats.entry(product.name.clone()).or_insert(0) += 1;
    }
    stats
}
