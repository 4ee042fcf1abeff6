//! Unified error codes for the PDV service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Tab (comanda) errors
//! - 5xxx: Payment / billing errors
//! - 6xxx: Product errors
//! - 7xxx: Table (mesa) errors
//! - 8xxx: Cash register (caixa) errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the web client can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Tab ====================
    /// Tab not found
    TabNotFound = 4001,
    /// Tab is not open (already closed or cancelled)
    TabNotOpen = 4002,
    /// Tab has no billable items
    TabEmpty = 4003,
    /// Tab item not found
    TabItemNotFound = 4004,
    /// Item status change is not allowed
    InvalidItemTransition = 4005,
    /// Item can no longer be edited (only pending items can)
    ItemNotEditable = 4006,

    // ==================== 5xxx: Payment ====================
    /// Invalid payment method
    PaymentInvalidMethod = 5001,
    /// Discount is invalid (percent outside 0-100, negative amount)
    InvalidDiscount = 5002,
    /// Bill total would be negative
    NegativeTotal = 5003,
    /// Sale not found
    SaleNotFound = 5004,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Product is not available for sale
    ProductUnavailable = 6004,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,
    /// Table number already exists in this restaurant
    TableNumberExists = 7003,
    /// Table status change is not allowed
    InvalidTableTransition = 7004,
    /// Table already has an open tab
    TableHasOpenTab = 7005,
    /// Restaurant not found
    RestaurantNotFound = 7101,

    // ==================== 8xxx: Cash register ====================
    /// Cash register session not found
    CashRegisterNotFound = 8001,
    /// No cash register session is open
    CashRegisterNotOpen = 8002,
    /// A cash register session is already open
    CashRegisterAlreadyOpen = 8003,
    /// Withdrawal exceeds the expected cash in the drawer
    InsufficientCash = 8004,
    /// Staff member not found
    StaffNotFound = 8101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Tab
            ErrorCode::TabNotFound => "Tab not found",
            ErrorCode::TabNotOpen => "Tab is not open",
            ErrorCode::TabEmpty => "Tab has no billable items",
            ErrorCode::TabItemNotFound => "Tab item not found",
            ErrorCode::InvalidItemTransition => "Item status change is not allowed",
            ErrorCode::ItemNotEditable => "Only pending items can be changed",

            // Payment
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::InvalidDiscount => "Invalid discount",
            ErrorCode::NegativeTotal => "Bill total cannot be negative",
            ErrorCode::SaleNotFound => "Sale not found",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::ProductUnavailable => "Product is not available",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::InvalidTableTransition => "Table status change is not allowed",
            ErrorCode::TableHasOpenTab => "Table already has an open tab",
            ErrorCode::RestaurantNotFound => "Restaurant not found",

            // Cash register
            ErrorCode::CashRegisterNotFound => "Cash register session not found",
            ErrorCode::CashRegisterNotOpen => "No cash register session is open",
            ErrorCode::CashRegisterAlreadyOpen => "A cash register session is already open",
            ErrorCode::InsufficientCash => "Not enough cash in the register",
            ErrorCode::StaffNotFound => "Staff member not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Tab
            4001 => Ok(ErrorCode::TabNotFound),
            4002 => Ok(ErrorCode::TabNotOpen),
            4003 => Ok(ErrorCode::TabEmpty),
            4004 => Ok(ErrorCode::TabItemNotFound),
            4005 => Ok(ErrorCode::InvalidItemTransition),
            4006 => Ok(ErrorCode::ItemNotEditable),

            // Payment
            5001 => Ok(ErrorCode::PaymentInvalidMethod),
            5002 => Ok(ErrorCode::InvalidDiscount),
            5003 => Ok(ErrorCode::NegativeTotal),
            5004 => Ok(ErrorCode::SaleNotFound),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::ProductUnavailable),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::TableNumberExists),
            7004 => Ok(ErrorCode::InvalidTableTransition),
            7005 => Ok(ErrorCode::TableHasOpenTab),
            7101 => Ok(ErrorCode::RestaurantNotFound),

            // Cash register
            8001 => Ok(ErrorCode::CashRegisterNotFound),
            8002 => Ok(ErrorCode::CashRegisterNotOpen),
            8003 => Ok(ErrorCode::CashRegisterAlreadyOpen),
            8004 => Ok(ErrorCode::InsufficientCash),
            8101 => Ok(ErrorCode::StaffNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::ValueOutOfRange,
        ErrorCode::TabNotFound,
        ErrorCode::TabNotOpen,
        ErrorCode::TabEmpty,
        ErrorCode::TabItemNotFound,
        ErrorCode::InvalidItemTransition,
        ErrorCode::ItemNotEditable,
        ErrorCode::PaymentInvalidMethod,
        ErrorCode::InvalidDiscount,
        ErrorCode::NegativeTotal,
        ErrorCode::SaleNotFound,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductInvalidPrice,
        ErrorCode::ProductOutOfStock,
        ErrorCode::ProductUnavailable,
        ErrorCode::TableNotFound,
        ErrorCode::TableOccupied,
        ErrorCode::TableNumberExists,
        ErrorCode::InvalidTableTransition,
        ErrorCode::TableHasOpenTab,
        ErrorCode::RestaurantNotFound,
        ErrorCode::CashRegisterNotFound,
        ErrorCode::CashRegisterNotOpen,
        ErrorCode::CashRegisterAlreadyOpen,
        ErrorCode::InsufficientCash,
        ErrorCode::StaffNotFound,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::TimeoutError,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::TabNotOpen.code(), 4002);
        assert_eq!(ErrorCode::NegativeTotal.code(), 5003);
        assert_eq!(ErrorCode::ProductOutOfStock.code(), 6003);
        assert_eq!(ErrorCode::TableHasOpenTab.code(), 7005);
        assert_eq!(ErrorCode::CashRegisterAlreadyOpen.code(), 8003);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_covers_every_code() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::TabEmpty.is_success());
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableOccupied).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("8002").unwrap();
        assert_eq!(code, ErrorCode::CashRegisterNotOpen);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::TabNotFound.to_string(), "4001");
    }
}
