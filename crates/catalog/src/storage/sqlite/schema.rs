//! SQLite schema definitions and SQL query constants.

/// SQL statement to create the products table.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    description TEXT NOT NULL,
    release_date TEXT NOT NULL,
    price REAL NOT NULL,
    star_rating REAL NOT NULL,
    image_url TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);
"#;

pub const INSERT_PRODUCT: &str = r#"
INSERT INTO products (name, code, description, release_date, price, star_rating, image_url)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_PRODUCT_BY_ID: &str = r#"
SELECT id, name, code, description, release_date, price, star_rating, image_url
FROM products
WHERE id = ?1
"#;

pub const SELECT_ALL_PRODUCTS: &str = r#"
SELECT id, name, code, description, release_date, price, star_rating, image_url
FROM products
ORDER BY id ASC
"#;

/// Case-insensitive substring match over every searchable column.
///
/// `instr` is used instead of `LIKE` so `%` and `_` in the term match
/// literally. Decimals are rendered with `printf('%!.15g')`, which
/// `format_decimal` reproduces. An empty term matches every row.
pub const SEARCH_PRODUCTS: &str = r#"
SELECT id, name, code, description, release_date, price, star_rating, image_url
FROM products
WHERE instr(lower(name), lower(?1)) > 0
   OR instr(lower(code), lower(?1)) > 0
   OR instr(lower(release_date), lower(?1)) > 0
   OR instr(printf('%!.15g', price), lower(?1)) > 0
   OR instr(printf('%!.15g', star_rating), lower(?1)) > 0
   OR instr(lower(image_url), lower(?1)) > 0
ORDER BY id ASC
"#;

pub const UPDATE_PRODUCT: &str = r#"
UPDATE products
SET name = ?2, code = ?3, description = ?4, release_date = ?5, price = ?6,
    star_rating = ?7, image_url = ?8
WHERE id = ?1
"#;

pub const DELETE_PRODUCT: &str = r#"
DELETE FROM products
WHERE id = ?1
"#;

pub const COUNT_PRODUCTS: &str = r#"
SELECT COUNT(*) FROM products
"#;
