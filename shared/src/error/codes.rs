//! Unified error codes for the installment ledger
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Installment sale errors
//! - 5xxx: Installment payment errors
//! - 6xxx: Product / upload errors
//! - 8xxx: Salesman errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller identity missing or malformed
    NotAuthenticated = 1001,

    // ==================== 4xxx: Installment sale ====================
    /// Installment sale not found
    SaleNotFound = 4001,
    /// Client supplied total disagrees with the pricing strategy
    SaleTermsMismatch = 4002,

    // ==================== 5xxx: Installment payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment amount must be positive
    PaymentInvalidAmount = 5002,
    /// Payment amount exceeds the remaining balance
    PaymentExceedsBalance = 5003,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,

    // ==================== 65xx: File Upload ====================
    /// File exceeds the configured size limit
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// File is not a decodable image
    InvalidImageFile = 6503,
    /// Empty file provided
    EmptyFile = 6505,
    /// File could not be written to storage
    FileStorageFailed = 6509,

    // ==================== 8xxx: Salesman ====================
    /// Salesman not found
    SalesmanNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Caller identity is missing",

            // Sale
            ErrorCode::SaleNotFound => "Installment sale not found.",
            ErrorCode::SaleTermsMismatch => "Total does not match price and profit",

            // Payment
            ErrorCode::PaymentNotFound => "Installment payment not found",
            ErrorCode::PaymentInvalidAmount => "Payment amount must be greater than zero",
            ErrorCode::PaymentExceedsBalance => "Payment amount cannot exceed the remaining balance",

            // Product
            ErrorCode::ProductNotFound => "Product not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Salesman
            ErrorCode::SalesmanNotFound => "Salesman not found",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

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
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Sale
            4001 => Ok(ErrorCode::SaleNotFound),
            4002 => Ok(ErrorCode::SaleTermsMismatch),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentInvalidAmount),
            5003 => Ok(ErrorCode::PaymentExceedsBalance),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6505 => Ok(ErrorCode::EmptyFile),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // Salesman
            8001 => Ok(ErrorCode::SalesmanNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
