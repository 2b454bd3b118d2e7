//! 统一错误处理
//!
//! API 层错误类型全部来自 `shared::error`，这里只做 re-export，
//! 让 handler 通过 `crate::utils` 统一引用。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::SaleNotFound))
//!
//! // 带字段级详情的校验错误
//! Err(AppError::field_errors([("customer_cnic", "customer_cnic is required")]))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
