//! Installment Sale Repository

use super::RepoResult;
use crate::ledger::SaleQuote;
use shared::models::{InstallmentSale, SaleStatus};
use sqlx::{Executor, Sqlite};

const SALE_COLUMNS: &str = "id, product_id, customer_id, salesman_id, pricing_mode, price, profit, interest_rate, total, down_payment, monthly_installment, duration, status, created_at, updated_at";

/// Insert a new sale; status is always `active`
pub async fn create<'e, E>(
    executor: E,
    product_id: i64,
    customer_id: i64,
    quote: &SaleQuote,
) -> RepoResult<InstallmentSale>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO installment_sale (product_id, customer_id, salesman_id, pricing_mode, price, profit, interest_rate, total, down_payment, monthly_installment, duration, status, created_at, updated_at) \
         VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12) RETURNING {SALE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, InstallmentSale>(&sql)
        .bind(product_id)
        .bind(customer_id)
        .bind(quote.mode.as_str())
        .bind(quote.price)
        .bind(quote.profit)
        .bind(quote.interest_rate)
        .bind(quote.total)
        .bind(quote.down_payment)
        .bind(quote.monthly_installment)
        .bind(quote.duration)
        .bind(quote.status.as_str())
        .bind(now)
        .fetch_one(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<InstallmentSale>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {SALE_COLUMNS} FROM installment_sale WHERE id = ?");
    let row = sqlx::query_as::<_, InstallmentSale>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// All sales, newest first
pub async fn find_all<'e, E>(executor: E) -> RepoResult<Vec<InstallmentSale>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql =
        format!("SELECT {SALE_COLUMNS} FROM installment_sale ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, InstallmentSale>(&sql)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// Sales assigned to one salesman, newest first
pub async fn find_by_salesman<'e, E>(
    executor: E,
    salesman_id: i64,
) -> RepoResult<Vec<InstallmentSale>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {SALE_COLUMNS} FROM installment_sale WHERE salesman_id = ? ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, InstallmentSale>(&sql)
        .bind(salesman_id)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// Sales with no salesman, in creation order
pub async fn find_unassigned<'e, E>(executor: E) -> RepoResult<Vec<InstallmentSale>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {SALE_COLUMNS} FROM installment_sale WHERE salesman_id IS NULL ORDER BY id"
    );
    let rows = sqlx::query_as::<_, InstallmentSale>(&sql)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// Touch `updated_at`; inside a transaction this takes the write lock
///
/// Returns `false` when the sale does not exist.
pub async fn touch<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE installment_sale SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Touch the sale owning a payment, taking the write lock the same way
///
/// Returns `false` when the payment does not exist.
pub async fn touch_by_payment<'e, E>(executor: E, payment_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE installment_sale SET updated_at = ? WHERE id = (SELECT installment_sale_id FROM installment_payment WHERE id = ?)",
    )
    .bind(now)
    .bind(payment_id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_status<'e, E>(executor: E, id: i64, status: SaleStatus) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE installment_sale SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Assign a salesman to a sale that has none
///
/// Returns `false` if the sale was assigned in the meantime.
pub async fn assign_salesman<'e, E>(executor: E, id: i64, salesman_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE installment_sale SET salesman_id = ?, updated_at = ? WHERE id = ? AND salesman_id IS NULL",
    )
    .bind(salesman_id)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}
