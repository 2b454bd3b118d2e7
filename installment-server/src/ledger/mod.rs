//! 账本模块 - 分期销售的金额计算
//!
//! - [`money`] - Decimal 精确运算辅助函数
//! - [`engine`] - 已付/余额/状态推导 (纯函数)
//! - [`pricing`] - 定价策略 (固定利润 / 利率)

pub mod engine;
pub mod money;
pub mod pricing;

pub use engine::{LedgerError, Transition};
pub use pricing::{PricingError, SaleQuote};
