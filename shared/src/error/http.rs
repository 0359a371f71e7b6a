//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use super::types::AppError;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::ValueOutOfRange
            | Self::InvalidAmount
            | Self::InvalidCurrency
            | Self::EmptyRefundReason => StatusCode::BAD_REQUEST,

            // 404 Not Found
            Self::NotFound | Self::EscrowNotFound | Self::SupplierNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists
            | Self::InvalidStateTransition
            | Self::EscrowAlreadyExists
            | Self::EscrowExpired => StatusCode::CONFLICT,

            // 503 Service Unavailable
            Self::DependencyUnavailable | Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body produced for error responses
///
/// ```json
/// {
///   "code": 4002,
///   "message": "Invalid escrow state transition",
///   "details": { "from": "RELEASED" }
/// }
/// ```
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a std::collections::HashMap<String, serde_json::Value>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            // Internal details are logged, not exposed to the caller
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
            details: self.details.as_ref(),
        };
        (status, Json(&body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ErrorCode::InvalidAmount.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::EscrowNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::InvalidStateTransition.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::DependencyUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
