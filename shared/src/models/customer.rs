//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity (分期客户)
///
/// Identity for upsert purposes is the national id (`cnic`); the phone
/// number is not unique and may be shared between customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: String,
    pub cnic: String,
    /// Relative path of the stored customer photo
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Customer fields submitted with a sale (insert-or-update keyed on `cnic`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: String,
    pub cnic: String,
}
