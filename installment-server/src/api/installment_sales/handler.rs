//! Installment Sale API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use shared::models::{SaleCreated, SaleDetail};

use super::form;
use crate::auth::CallerIdentity;
use crate::core::ServerState;
use crate::sales::store;
use crate::utils::AppResult;

const SALE_CREATED: &str = "Installment sale created successfully!";

/// GET /api/installment-sales - 获取所有销售 (含账本数据)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SaleDetail>>> {
    let sales = store::list_sales(&state.pool).await?;
    Ok(Json(sales))
}

/// GET /api/installment-sales/:id - 获取单个销售
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SaleDetail>> {
    let sale = store::get_sale(&state.pool, id).await?;
    Ok(Json(sale))
}

/// POST /api/installment-sales - 创建销售 (multipart，含可选客户照片)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<SaleCreated>> {
    let form = form::read_multipart(multipart).await?;

    // 照片按内容寻址，事务回滚时最多留下一个可复用的文件
    let image = match &form.image {
        Some(upload) => Some(
            state
                .images
                .store_customer_image(&upload.data, &upload.filename)?,
        ),
        None => None,
    };

    let sale = store::create_sale(&state.pool, &form.sale, image.as_deref()).await?;

    Ok(Json(SaleCreated {
        message: SALE_CREATED.to_string(),
        sale_id: sale.id,
    }))
}

/// GET /api/unassigned-installment-customers - 未分配业务员的销售
pub async fn list_unassigned(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<SaleDetail>>> {
    let sales = store::list_unassigned(&state.pool).await?;
    Ok(Json(sales))
}

/// GET /api/salesman/installment-sales - 当前业务员负责的销售
pub async fn list_mine(
    State(state): State<ServerState>,
    caller: CallerIdentity,
) -> AppResult<Json<Vec<SaleDetail>>> {
    let sales = store::list_for_salesman(&state.pool, caller.user_id).await?;
    tracing::debug!(
        user_id = caller.user_id,
        role = %caller.role,
        count = sales.len(),
        "Salesman sales listed"
    );
    Ok(Json(sales))
}

/// GET /api/salesman/print-list/:id - 业务员收款清单
pub async fn print_list(
    State(state): State<ServerState>,
    Path(salesman_id): Path<i64>,
) -> AppResult<Json<Vec<SaleDetail>>> {
    let sales = store::list_for_salesman(&state.pool, salesman_id).await?;
    Ok(Json(sales))
}
