//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 4xxx: Installment sale errors
/// - 5xxx: Installment payment errors
/// - 6xxx: Product / upload errors
/// - 8xxx: Salesman errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Installment sale errors (4xxx)
    Sale,
    /// Installment payment errors (5xxx)
    Payment,
    /// Product / upload errors (6xxx)
    Product,
    /// Salesman errors (8xxx)
    Salesman,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..4000 => Self::Auth,
            4000..5000 => Self::Sale,
            5000..6000 => Self::Payment,
            6000..8000 => Self::Product,
            8000..9000 => Self::Salesman,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Sale => "sale",
            Self::Payment => "payment",
            Self::Product => "product",
            Self::Salesman => "salesman",
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
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Sale);
        assert_eq!(ErrorCategory::from_code(5003), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6501), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Salesman);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::SaleNotFound.category(), ErrorCategory::Sale);
        assert_eq!(
            ErrorCode::PaymentExceedsBalance.category(),
            ErrorCategory::Payment
        );
        assert_eq!(
            ErrorCode::SalesmanNotFound.category(),
            ErrorCategory::Salesman
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Payment).unwrap();
        assert_eq!(json, "\"payment\"");

        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
