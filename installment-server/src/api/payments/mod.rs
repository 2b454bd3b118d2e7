//! Payment API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/installment-sales/{id}/payments | POST | 新增还款 |
//! | /api/installment-payments/{id} | PUT | 修改还款 |
//! | /api/installment-payments/{id} | DELETE | 删除还款 |

mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/installment-sales/{id}/payments", post(handler::create))
        .nest("/api/installment-payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{id}", put(handler::update).delete(handler::delete))
}
