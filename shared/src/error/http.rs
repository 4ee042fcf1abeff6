//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TabNotFound
            | Self::TabItemNotFound
            | Self::SaleNotFound
            | Self::ProductNotFound
            | Self::TableNotFound
            | Self::RestaurantNotFound
            | Self::CashRegisterNotFound
            | Self::StaffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::TabNotOpen
            | Self::TableOccupied
            | Self::TableNumberExists
            | Self::TableHasOpenTab
            | Self::CashRegisterAlreadyOpen
            | Self::CashRegisterNotOpen => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (well-formed, but breaks a business rule)
            Self::TabEmpty
            | Self::InvalidItemTransition
            | Self::ItemNotEditable
            | Self::InvalidTableTransition
            | Self::NegativeTotal
            | Self::ProductOutOfStock
            | Self::ProductUnavailable
            | Self::InsufficientCash => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TabNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::RestaurantNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::TabNotOpen.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::CashRegisterAlreadyOpen.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_business_rule_status() {
        assert_eq!(
            ErrorCode::NegativeTotal.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InsufficientCash.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_bad_request_default() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidDiscount.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
