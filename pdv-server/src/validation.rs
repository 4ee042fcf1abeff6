//! Input validation helpers
//!
//! Text length limits and numeric checks shared by the handlers.

use rust_decimal::Decimal;
use shared::billing::{MAX_PRICE, MAX_QUANTITY};
use shared::error::{AppError, ErrorCode};

/// Entity names: restaurant, product, category, operator, customer
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Quantity must be in 1..=MAX_QUANTITY
pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"),
        )
        .with_detail("field", "quantity"));
    }
    Ok(())
}

/// Prices are non-negative, bounded and carry at most 2 decimal places
pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO || price > MAX_PRICE || price.normalize().scale() > 2 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("price must be between 0 and {MAX_PRICE} with at most 2 decimals, got {price}"),
        )
        .with_detail("field", "price"));
    }
    Ok(())
}

/// Non-negative money amount (balances, cover charge)
pub fn validate_non_negative(value: Decimal, field: &str) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be non-negative, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Strictly positive money amount (cash movements)
pub fn validate_positive(value: Decimal, field: &str) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be positive, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Rate in percent, 0..=100
pub fn validate_percent(value: Decimal, field: &str) -> Result<(), AppError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between 0 and 100, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Clamp page/per_page query params: per_page defaults to 20, max 100
pub fn page_bounds(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    let page = page.unwrap_or(1).max(1);
    (per_page, (page - 1) * per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn required_text() {
        assert!(validate_required_text("Mesa 1", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("sem cebola".into()), "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert_eq!(
            validate_quantity(MAX_QUANTITY + 1).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn price_bounds() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(1990, 2)).is_ok());
        assert!(validate_price(Decimal::new(19900, 3)).is_ok()); // 19.900
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
        assert!(validate_price(Decimal::new(19999, 3)).is_err());
        assert_eq!(
            validate_price(MAX_PRICE + Decimal::ONE).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
    }

    #[test]
    fn money_checks() {
        assert!(validate_non_negative(Decimal::ZERO, "opening_balance").is_ok());
        assert!(validate_non_negative(Decimal::NEGATIVE_ONE, "opening_balance").is_err());
        assert!(validate_positive(Decimal::ZERO, "amount").is_err());
        assert!(validate_percent(Decimal::from(10), "service_fee_percent").is_ok());
        assert!(validate_percent(Decimal::from(101), "service_fee_percent").is_err());
    }

    #[test]
    fn pagination_defaults() {
        assert_eq!(page_bounds(None, None), (20, 0));
        assert_eq!(page_bounds(Some(3), Some(50)), (50, 100));
        assert_eq!(page_bounds(Some(0), Some(1000)), (100, 0));
    }

    proptest! {
        #[test]
        fn pagination_is_always_in_range(page in any::<Option<i32>>(), per_page in any::<Option<i32>>()) {
            let (limit, offset) = page_bounds(page.map(i64::from), per_page.map(i64::from));
            prop_assert!((1..=100).contains(&limit));
            prop_assert!(offset >= 0);
            prop_assert_eq!(offset % limit, 0);
        }
    }
}
