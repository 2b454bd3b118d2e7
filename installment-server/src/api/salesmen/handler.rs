//! Salesman API Handlers

use axum::{Json, extract::State};
use shared::models::{AssignSalesmenRequest, AssignmentReport, Salesman};

use crate::core::ServerState;
use crate::db::repository::salesman;
use crate::sales::assignment;
use crate::utils::AppResult;

/// GET /api/salesmen - 获取在职业务员
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Salesman>>> {
    let salesmen = salesman::find_all(&state.pool).await?;
    Ok(Json(salesmen))
}

/// POST /api/assign-salesmen - 分配未分配的销售
pub async fn assign(
    State(state): State<ServerState>,
    Json(payload): Json<AssignSalesmenRequest>,
) -> AppResult<Json<AssignmentReport>> {
    let report = assignment::assign_salesmen(&state.pool, &payload).await?;
    Ok(Json(report))
}
