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
            | Self::SaleNotFound
            | Self::PaymentNotFound
            | Self::ProductNotFound
            | Self::SalesmanNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            // 422 Unprocessable Entity (well-formed request, rejected by ledger rules)
            Self::ValidationFailed
            | Self::ValueOutOfRange
            | Self::SaleTermsMismatch
            | Self::PaymentInvalidAmount
            | Self::PaymentExceedsBalance => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::DatabaseError | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (malformed input, upload rejections)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
