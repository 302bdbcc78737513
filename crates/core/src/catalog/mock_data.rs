use chrono::NaiveDate;

use super::types::Product;

/// Generates the demo catalog used to seed an empty store.
///
/// Products are returned unsaved; the store assigns identities on insert.
pub fn generate_seed_products() -> Vec<Product> {
    let date = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        Product::new(
            "Leaf Rake",
            "GDN-0011",
            "Leaf rake with 48-inch wooden handle",
            date(2021, 3, 19),
            19.95,
            3.2,
            "assets/images/leaf_rake.png",
        ),
        Product::new(
            "Garden Cart",
            "GDN-0023",
            "15 gallon capacity rolling garden cart",
            date(2021, 3, 18),
            32.99,
            4.2,
            "assets/images/garden_cart.png",
        ),
        Product::new(
            "Hammer",
            "TBX-0048",
            "Curved claw steel hammer",
            date(2021, 5, 21),
            8.9,
            4.8,
            "assets/images/hammer.png",
        ),
        Product::new(
            "Saw",
            "TBX-0022",
            "15-inch steel blade hand saw",
            date(2021, 5, 15),
            11.55,
            3.7,
            "assets/images/saw.png",
        ),
        Product::new(
            "Video Game Controller",
            "GMG-0042",
            "Standard two-button video game controller",
            date(2020, 10, 15),
            35.95,
            4.6,
            "assets/images/xbox-controller.png",
        ),
    ]
}
