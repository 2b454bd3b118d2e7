//! Product Model
//!
//! Products are owned by the catalog side of the point-of-sale system; the
//! installment ledger only references them.

use serde::{Deserialize, Serialize};

/// Product reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
}
