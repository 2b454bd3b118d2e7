//! Data models
//!
//! Shared between installment-server and its API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod customer;
pub mod installment;
pub mod product;
pub mod salesman;

// Re-exports
pub use customer::*;
pub use installment::*;
pub use product::*;
pub use salesman::*;
