//! `AppError` and the error body sent to clients

use std::collections::HashMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::category::ErrorCategory;
use super::codes::ErrorCode;

/// Error returned by every handler and service
///
/// `details` carries machine-readable context such as the offending field
/// or the id of the resource involved.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// The tab exists but is fechada or cancelada
    pub fn tab_not_open(tab_id: i64, status: impl Into<String>) -> Self {
        let status = status.into();
        Self::with_message(ErrorCode::TabNotOpen, format!("Tab {tab_id} is {status}, not open"))
            .with_detail("tab_id", tab_id)
            .with_detail("status", status)
    }
}

/// JSON body of an error response
///
/// Successful responses carry the resource itself; only failures use this
/// envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl From<AppError> for ApiResponse {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message,
            details: err.details,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error");
        }

        (status, Json(ApiResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_message() {
        let err = AppError::new(ErrorCode::TableNotFound);
        assert_eq!(err.code, ErrorCode::TableNotFound);
        assert_eq!(err.message, "Table not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn details_accumulate() {
        let err = AppError::validation("quantity must be positive")
            .with_detail("field", "quantity")
            .with_detail("value", 0);

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["field"], "quantity");
        assert_eq!(details["value"], 0);
    }

    #[test]
    fn tab_not_open_names_status() {
        let err = AppError::tab_not_open(42, "fechada");
        assert_eq!(err.code, ErrorCode::TabNotOpen);
        assert_eq!(err.to_string(), "Tab 42 is fechada, not open");
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn error_body_shape() {
        let err = AppError::with_message(ErrorCode::TabNotFound, "Tab not found").with_detail("tab_id", 123);
        let json = serde_json::to_value(ApiResponse::error(&err)).unwrap();
        assert_eq!(json["code"], 4001);
        assert_eq!(json["message"], "Tab not found");
        assert_eq!(json["details"]["tab_id"], 123);

        let bare = serde_json::to_string(&ApiResponse::from(AppError::new(ErrorCode::InternalError))).unwrap();
        assert!(bare.contains("\"code\":9001"));
        assert!(!bare.contains("details"));
    }
}
