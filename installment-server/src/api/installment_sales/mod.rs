//! Installment Sale API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/installment-sales | GET | 全部销售 (新到旧) | 无 |
//! | /api/installment-sales | POST | 创建销售 (multipart) | 无 |
//! | /api/installment-sales/{id} | GET | 单个销售 | 无 |
//! | /api/unassigned-installment-customers | GET | 未分配业务员的销售 | 无 |
//! | /api/salesman/installment-sales | GET | 当前业务员的销售 | 调用者身份 |
//! | /api/salesman/print-list/{id} | GET | 指定业务员的收款清单 | 无 |

mod form;
mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/installment-sales", routes())
        .route(
            "/api/unassigned-installment-customers",
            get(handler::list_unassigned),
        )
        .route("/api/salesman/installment-sales", get(handler::list_mine))
        .route("/api/salesman/print-list/{id}", get(handler::print_list))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
}
