//! Installment Payment Repository

use super::RepoResult;
use shared::models::InstallmentPayment;
use sqlx::{Executor, Sqlite};

const PAYMENT_COLUMNS: &str =
    "id, installment_sale_id, amount, paid_at, note, created_at, updated_at";

pub async fn create<'e, E>(
    executor: E,
    sale_id: i64,
    amount: f64,
    paid_at: &str,
    note: Option<&str>,
) -> RepoResult<InstallmentPayment>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO installment_payment (installment_sale_id, amount, paid_at, note, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING {PAYMENT_COLUMNS}"
    );
    let row = sqlx::query_as::<_, InstallmentPayment>(&sql)
        .bind(sale_id)
        .bind(amount)
        .bind(paid_at)
        .bind(note)
        .bind(now)
        .fetch_one(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<InstallmentPayment>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM installment_payment WHERE id = ?");
    let row = sqlx::query_as::<_, InstallmentPayment>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Payment set of a sale, ordered by payment date then id
pub async fn find_by_sale<'e, E>(executor: E, sale_id: i64) -> RepoResult<Vec<InstallmentPayment>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {PAYMENT_COLUMNS} FROM installment_payment WHERE installment_sale_id = ? ORDER BY paid_at, id"
    );
    let rows = sqlx::query_as::<_, InstallmentPayment>(&sql)
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// Replace amount and note of a payment
pub async fn update<'e, E>(
    executor: E,
    id: i64,
    amount: f64,
    note: Option<&str>,
) -> RepoResult<Option<InstallmentPayment>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let sql = format!(
        "UPDATE installment_payment SET amount = ?1, note = ?2, updated_at = ?3 WHERE id = ?4 RETURNING {PAYMENT_COLUMNS}"
    );
    let row = sqlx::query_as::<_, InstallmentPayment>(&sql)
        .bind(amount)
        .bind(note)
        .bind(now)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM installment_payment WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}
