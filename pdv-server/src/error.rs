//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers and services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::BoxError;

/// PostgreSQL SQLSTATE codes the service translates
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (logged, mapped by [`map_db_error`])
/// - `App`: Business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<shared::billing::BillingError> for ServiceError {
    fn from(e: shared::billing::BillingError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => map_db_error(db_err.as_ref()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Translate a database error into the error the client sees
pub fn map_db_error(err: &(dyn std::error::Error + Send + Sync + 'static)) -> AppError {
    if let Some(sqlx_err) = err.downcast_ref::<sqlx::Error>() {
        match sqlx_err {
            sqlx::Error::RowNotFound => return AppError::new(ErrorCode::NotFound),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    tracing::warn!(constraint = ?db.constraint(), "Unique constraint violated");
                    return AppError::with_message(
                        ErrorCode::AlreadyExists,
                        "Resource already exists",
                    )
                    .with_detail("constraint", db.constraint().unwrap_or_default());
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    tracing::warn!(constraint = ?db.constraint(), "Foreign key violated");
                    return AppError::invalid_request("Referenced resource does not exist")
                        .with_detail("constraint", db.constraint().unwrap_or_default());
                }
                _ => {}
            },
            sqlx::Error::PoolTimedOut => {
                tracing::error!(error = %sqlx_err, "Database pool timed out");
                return AppError::new(ErrorCode::TimeoutError);
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Service database error");
    AppError::new(ErrorCode::InternalError)
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn pool_timeout_maps_to_timeout() {
        let err: AppError = ServiceError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code, ErrorCode::TimeoutError);
    }

    #[test]
    fn other_errors_are_internal() {
        let boxed: BoxError = "connection reset".into();
        let err: AppError = ServiceError::from(boxed).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn app_errors_pass_through() {
        let err: AppError = ServiceError::from(AppError::new(ErrorCode::TabEmpty)).into();
        assert_eq!(err.code, ErrorCode::TabEmpty);
    }

    #[test]
    fn billing_errors_become_app_errors() {
        let billing = shared::billing::BillingError::NegativeFixedDiscount(
            rust_decimal::Decimal::NEGATIVE_ONE,
        );
        let err: AppError = ServiceError::from(billing).into();
        assert_eq!(err.code, ErrorCode::InvalidDiscount);
    }
}
