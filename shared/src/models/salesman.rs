//! Salesman Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Salesman (user with the sales associate role)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Salesman {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

/// Create salesman payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesmanCreate {
    pub name: String,
    pub email: Option<String>,
}

/// Body of `POST /api/assign-salesmen`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignSalesmenRequest {
    #[validate(length(min = 1, message = "at least one salesman is required"))]
    pub salesman_ids: Vec<i64>,
}

/// How many unassigned sales one salesman received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesmanAssignment {
    pub salesman: Salesman,
    pub customer_count: usize,
}

/// Result of a distribution run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub message: String,
    pub assignments: Vec<SalesmanAssignment>,
}
