//! Unified error system for the installment ledger
//!
//! This module provides a comprehensive error handling system with:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Installment sale errors
//! - 5xxx: Installment payment errors
//! - 6xxx: Product / upload errors
//! - 8xxx: Salesman errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::SaleNotFound);
//!
//! // Create an error with details
//! let err = AppError::new(ErrorCode::PaymentExceedsBalance)
//!     .with_detail("remaining_balance", 500.0);
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(5003));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
