//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and `Product`.

use catalog_core::catalog::{Product, RELEASE_DATE_FORMAT};
use chrono::NaiveDate;
use rusqlite::Row;

/// Convert a SQLite row to a Product.
///
/// Expected columns: id, name, code, description, release_date, price,
/// star_rating, image_url
pub fn row_to_product(row: &Row) -> rusqlite::Result<Product> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let code: String = row.get(2)?;
    let description: String = row.get(3)?;
    let release_date: String = row.get(4)?;
    let price: f64 = row.get(5)?;
    let star_rating: f64 = row.get(6)?;
    let image_url: String = row.get(7)?;

    Ok(Product {
        id: Some(id),
        name,
        code,
        description,
        release_date: parse_date(&release_date)?,
        price,
        star_rating,
        image_url,
    })
}

/// Format a date as `YYYY-MM-DD` for storage.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(RELEASE_DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, RELEASE_DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })
}
