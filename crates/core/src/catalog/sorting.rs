use std::cmp::Ordering;

use super::types::{Product, SortOrder};

/// Compares two products by name.
pub fn compare_by_name(a: &Product, b: &Product) -> Ordering {
    a.name.cmp(&b.name)
}

/// Compares two products by identity. Unsaved products sort first.
pub fn compare_by_id(a: &Product, b: &Product) -> Ordering {
    a.id.cmp(&b.id)
}

/// Sorts products alphabetically by name.
pub fn sort_by_name(products: &mut [Product]) {
    products.sort_by(compare_by_name);
}

/// Sorts products by ascending identity.
pub fn sort_by_id(products: &mut [Product]) {
    products.sort_by(compare_by_id);
}

/// Sorts products in the requested order.
pub fn sort_products(products: &mut [Product], order: SortOrder) {
    match order {
        SortOrder::Name => sort_by_name(products),
        SortOrder::Id => sort_by_id(products),
    }
}
