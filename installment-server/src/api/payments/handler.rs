//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{PaymentInput, PaymentOutcome};

use crate::core::ServerState;
use crate::sales::payments;
use crate::utils::AppResult;

/// POST /api/installment-sales/:id/payments - 新增还款
pub async fn create(
    State(state): State<ServerState>,
    Path(sale_id): Path<i64>,
    Json(payload): Json<PaymentInput>,
) -> AppResult<Json<PaymentOutcome>> {
    let outcome = payments::add_payment(&state.pool, sale_id, &payload).await?;
    Ok(Json(outcome))
}

/// PUT /api/installment-payments/:id - 修改还款
pub async fn update(
    State(state): State<ServerState>,
    Path(payment_id): Path<i64>,
    Json(payload): Json<PaymentInput>,
) -> AppResult<Json<PaymentOutcome>> {
    let outcome = payments::update_payment(&state.pool, payment_id, &payload).await?;
    Ok(Json(outcome))
}

/// DELETE /api/installment-payments/:id - 删除还款
pub async fn delete(
    State(state): State<ServerState>,
    Path(payment_id): Path<i64>,
) -> AppResult<Json<PaymentOutcome>> {
    let outcome = payments::delete_payment(&state.pool, payment_id).await?;
    Ok(Json(outcome))
}
