use thiserror::Error;

/// Errors that can occur when validating a product.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductError {
    #[error("Product name cannot be empty")]
    EmptyName,
    #[error("Product name too short (min 3 characters)")]
    NameTooShort,
    #[error("Product code cannot be empty")]
    EmptyCode,
    #[error("Invalid product code: {0} (min 6 characters, must contain '-')")]
    InvalidCode(String),
    #[error("Product description cannot be empty")]
    EmptyDescription,
    #[error("Product description too long (max 50 characters)")]
    DescriptionTooLong,
    #[error("Price out of range: {0} (must be between 1 and 10000)")]
    PriceOutOfRange(f64),
    #[error("Star rating out of range: {0} (must be between 1 and 5)")]
    RatingOutOfRange(f64),
    #[error("Image URL cannot be empty")]
    EmptyImageUrl,
    #[error("Image URL must reference a .png file: {0}")]
    InvalidImageUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_error_display() {
        assert_eq!(
            ProductError::NameTooShort.to_string(),
            "Product name too short (min 3 characters)"
        );
        assert_eq!(
            ProductError::InvalidCode("AB1".to_string()).to_string(),
            "Invalid product code: AB1 (min 6 characters, must contain '-')"
        );
        assert_eq!(
            ProductError::PriceOutOfRange(0.5).to_string(),
            "Price out of range: 0.5 (must be between 1 and 10000)"
        );
    }
}
