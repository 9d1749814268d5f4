//! Field-level and cross-entity validation rules.
//!
//! The functions here are stateless; services call them before any write so
//! a rejected mutation never reaches the store.

use chrono::{DateTime, Utc};
use thiserror::Error;
use validator::ValidateEmail;

use crate::value_objects::{CustomerId, Money, RestaurantId};

/// Upper bound for a product price.
pub const MAX_PRICE: Money = Money::from_cents(1_000_000);

/// Minimum number of characters in a name.
pub const MIN_NAME_LENGTH: usize = 2;

/// A rejected input or business rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("{field} should have at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("Email is invalid: {0}")]
    InvalidEmail(String),

    #[error("Email already exists")]
    EmailTaken,

    #[error("Phone already exists: {0}")]
    PhoneTaken(String),

    #[error("Cannot update inactive customer")]
    InactiveCustomer,

    #[error("cannot add products to inactive restaurant")]
    InactiveRestaurant,

    #[error("Cannot update unavailable product")]
    UnavailableProduct,

    #[error("Price is required")]
    PriceRequired,

    #[error("Price must be greater than zero")]
    PriceNotPositive,

    #[error("Price must not exceed {0}")]
    PriceTooHigh(Money),

    #[error("Price must have at most 2 decimal places")]
    PricePrecision,

    #[error("Minimum and maximum price are required")]
    PriceRangeRequired,

    #[error("Price range bounds must not be negative")]
    NegativePriceRange,

    #[error("Minimum price must not be greater than maximum price")]
    InvertedPriceRange,

    #[error("Customer is required")]
    CustomerRequired,

    #[error("Restaurant is required")]
    RestaurantRequired,

    #[error("Customer does not exist: {0}")]
    UnknownCustomer(CustomerId),

    #[error("Restaurant does not exist: {0}")]
    UnknownRestaurant(RestaurantId),

    #[error("Total value must be greater than zero")]
    TotalNotPositive,

    #[error("Total value must have at most 2 decimal places")]
    TotalPrecision,

    #[error("Total value is too large")]
    TotalTooLarge,

    #[error("Items list cannot be empty")]
    EmptyItems,

    #[error("Product list cannot be empty")]
    EmptyProductList,

    #[error("Product not available: {0}")]
    ProductUnavailable(String),

    #[error("Invalid status '{0}'. Valid values: PENDING, CONFIRMED, DELIVERED, CANCELLED")]
    InvalidStatus(String),

    #[error("Rating must be between 0 and 5")]
    RatingOutOfRange,

    #[error("Delivery fee must not be negative")]
    NegativeDeliveryFee,

    #[error("Delivery fee must have at most 2 decimal places")]
    DeliveryFeePrecision,

    #[error("Start date must not be after end date")]
    InvalidDateRange,
}

/// Checks that a text field is not blank.
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

/// Checks that a name is present and has at least two characters.
pub fn name(value: &str) -> Result<(), ValidationError> {
    required("Name", value)?;
    if value.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "Name",
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Checks that an e-mail address is present and well formed.
pub fn email(value: &str) -> Result<(), ValidationError> {
    required("Email", value)?;
    if !value.trim().to_string().validate_email() {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

/// Validates a product price and converts it to [`Money`].
///
/// The price is required, must be positive, must not exceed
/// [`MAX_PRICE`] and may carry at most two decimal places.
pub fn price(value: Option<f64>) -> Result<Money, ValidationError> {
    let value = value.ok_or(ValidationError::PriceRequired)?;
    if value.is_nan() || value <= 0.0 {
        return Err(ValidationError::PriceNotPositive);
    }
    if value > MAX_PRICE.as_decimal() {
        return Err(ValidationError::PriceTooHigh(MAX_PRICE));
    }
    Money::from_decimal(value).ok_or(ValidationError::PricePrecision)
}

/// Validates the bounds of a price-range search.
pub fn price_range(min: Option<f64>, max: Option<f64>) -> Result<(f64, f64), ValidationError> {
    let (Some(min), Some(max)) = (min, max) else {
        return Err(ValidationError::PriceRangeRequired);
    };
    if min.is_nan() || max.is_nan() {
        return Err(ValidationError::PriceRangeRequired);
    }
    if min < 0.0 || max < 0.0 {
        return Err(ValidationError::NegativePriceRange);
    }
    if min > max {
        return Err(ValidationError::InvertedPriceRange);
    }
    Ok((min, max))
}

/// Checks an optional restaurant rating against the `[0, 5]` scale.
pub fn rating(value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(r) if !(0.0..=5.0).contains(&r) => Err(ValidationError::RatingOutOfRange),
        _ => Ok(()),
    }
}

/// Validates a delivery fee, treating an absent fee as free delivery.
pub fn delivery_fee(value: Option<f64>) -> Result<Money, ValidationError> {
    let Some(value) = value else {
        return Ok(Money::zero());
    };
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::NegativeDeliveryFee);
    }
    Money::from_decimal(value).ok_or(ValidationError::DeliveryFeePrecision)
}

/// Validates an order total and converts it to [`Money`].
pub fn total_value(value: Option<f64>) -> Result<Money, ValidationError> {
    match value {
        Some(v) if v >= Money::MAX_DECIMAL => Err(ValidationError::TotalTooLarge),
        Some(v) if v > 0.0 => Money::from_decimal(v).ok_or(ValidationError::TotalPrecision),
        _ => Err(ValidationError::TotalNotPositive),
    }
}

/// Checks that a date range is not inverted.
pub fn date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}
