//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Tab errors
/// - 5xxx: Payment errors
/// - 6xxx: Product errors
/// - 7xxx: Table errors
/// - 8xxx: Cash register errors
/// - 9xxx: System errors
///
/// 1xxx-3xxx are reserved for authentication, permission and tenancy,
/// which live in the external backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Reserved ranges handled outside this service (1xxx-3xxx)
    External,
    /// Tab errors (4xxx)
    Tab,
    /// Payment errors (5xxx)
    Payment,
    /// Product errors (6xxx)
    Product,
    /// Table errors (7xxx)
    Table,
    /// Cash register errors (8xxx)
    CashRegister,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..4000 => Self::External,
            4000..5000 => Self::Tab,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Product,
            7000..8000 => Self::Table,
            8000..9000 => Self::CashRegister,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::External => "external",
            Self::Tab => "tab",
            Self::Payment => "payment",
            Self::Product => "product",
            Self::Table => "table",
            Self::CashRegister => "cash_register",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::External);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Tab);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(7101), ErrorCategory::Table);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::CashRegister);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TabEmpty.category(), ErrorCategory::Tab);
        assert_eq!(ErrorCode::NegativeTotal.category(), ErrorCategory::Payment);
        assert_eq!(
            ErrorCode::ProductOutOfStock.category(),
            ErrorCategory::Product
        );
        assert_eq!(ErrorCode::TableOccupied.category(), ErrorCategory::Table);
        assert_eq!(
            ErrorCode::InsufficientCash.category(),
            ErrorCategory::CashRegister
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ErrorCategory::CashRegister).unwrap();
        assert_eq!(json, "\"cash_register\"");

        let category: ErrorCategory = serde_json::from_str("\"tab\"").unwrap();
        assert_eq!(category, ErrorCategory::Tab);
        assert_eq!(category.name(), "tab");
    }
}
