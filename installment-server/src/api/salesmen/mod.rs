//! Salesman API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/salesmen | GET | 在职业务员 |
//! | /api/assign-salesmen | POST | 将未分配销售平均分给业务员 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/salesmen", get(handler::list))
        .route("/api/assign-salesmen", post(handler::assign))
}
