use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used when a release date is rendered as searchable text.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identity. `None` until the product is first saved.
    pub id: Option<i64>,
    pub name: String,
    /// SKU-like code, e.g. `GDN-0011`.
    pub code: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub price: f64,
    pub star_rating: f64,
    /// Reference to a PNG image.
    pub image_url: String,
}

impl Product {
    /// Creates a new, not yet persisted product.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        release_date: NaiveDate,
        price: f64,
        star_rating: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            code: code.into(),
            description: description.into(),
            release_date,
            price,
            star_rating,
            image_url: image_url.into(),
        }
    }

    /// Sets a specific ID for this product (used by stores and tests).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns true once the store has assigned an identity.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the textual fields matched by free-text search, in order:
    /// name, code, release date, price, star rating and image URL.
    pub fn search_fields(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.code.clone(),
            self.release_date.format(RELEASE_DATE_FORMAT).to_string(),
            format_decimal(self.price),
            format_decimal(self.star_rating),
            self.image_url.clone(),
        ]
    }

    /// Case-insensitive substring match against every searchable field.
    ///
    /// Only ASCII letters are folded, the same as SQL `lower()`. An empty
    /// term matches every product.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_ascii_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_ascii_lowercase().contains(&needle))
    }
}

/// Significant digits kept when a decimal is rendered for search.
pub const SEARCH_DECIMAL_DIGITS: usize = 15;

/// Renders a decimal as SQLite's `printf('%!.15g', x)` does: 15 significant
/// digits, trailing zeros trimmed, at least one fractional digit (`100.0`,
/// `19.99`, `1.0e+20`).
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.*e}", SEARCH_DECIMAL_DIGITS - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SEARCH_DECIMAL_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs());
    }

    let decimals = (SEARCH_DECIMAL_DIGITS as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}"))
}

fn trim_fraction(number: &str) -> String {
    match number.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{number}.0"),
    }
}

/// Ordering applied to product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Alphabetical by product name.
    #[default]
    Name,
    /// Ascending by store-assigned identity.
    Id,
}
