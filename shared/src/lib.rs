//! Shared types for the installment ledger
//!
//! Error codes, API response structures and the domain models exchanged
//! between the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
