//! Sale Record Store
//!
//! Creation writes customer, sale and guarantor in one transaction. Reads
//! assemble [`SaleDetail`] views with the ledger figures computed at read
//! time.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{InstallmentSale, SaleCreate, SaleDetail};
use sqlx::SqlitePool;

use crate::db::repository::{customer, guarantor, payment, product, sale, salesman};
use crate::ledger::{engine, pricing};

/// Persist a new sale with its customer (upserted by national id) and guarantor
///
/// `image` is the stored customer photo reference, if one was uploaded.
pub async fn create_sale(
    pool: &SqlitePool,
    data: &SaleCreate,
    image: Option<&str>,
) -> AppResult<InstallmentSale> {
    let quote = pricing::quote(&data.terms)?;

    let mut tx = pool.begin().await.map_err(|e| AppError::database(e.to_string()))?;

    // 第一条语句是写操作，事务从一开始就持有写锁
    let customer = customer::upsert(&mut *tx, &data.customer, image).await?;

    if product::find_by_id(&mut *tx, data.product_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::ProductNotFound).with_detail("id", data.product_id));
    }

    let created = sale::create(&mut *tx, data.product_id, customer.id, &quote).await?;
    guarantor::create(&mut *tx, created.id, &data.guarantor).await?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        sale_id = created.id,
        customer_id = customer.id,
        product_id = data.product_id,
        pricing_mode = quote.mode.as_str(),
        total = quote.total,
        "Installment sale created"
    );

    Ok(created)
}

/// Attach relations and ledger figures to a sale row
async fn load_detail(pool: &SqlitePool, row: InstallmentSale) -> AppResult<SaleDetail> {
    let product = product::find_by_id(pool, row.product_id).await?;
    let customer = customer::find_by_id(pool, row.customer_id).await?;
    let guarantor = guarantor::find_by_sale(pool, row.id).await?;
    let payments = payment::find_by_sale(pool, row.id).await?;
    let salesman = match row.salesman_id {
        Some(id) => salesman::find_by_id(pool, id).await?,
        None => None,
    };
    let ledger = engine::summarize(&row, &payments);

    Ok(SaleDetail {
        sale: row,
        ledger,
        product,
        customer,
        guarantor,
        payments,
        salesman,
    })
}

async fn load_details(pool: &SqlitePool, rows: Vec<InstallmentSale>) -> AppResult<Vec<SaleDetail>> {
    let mut details = Vec::with_capacity(rows.len());
    for row in rows {
        details.push(load_detail(pool, row).await?);
    }
    Ok(details)
}

/// One sale with relations, `SaleNotFound` if absent
pub async fn get_sale(pool: &SqlitePool, id: i64) -> AppResult<SaleDetail> {
    let row = sale::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SaleNotFound).with_detail("id", id))?;
    load_detail(pool, row).await
}

/// All sales, newest first
pub async fn list_sales(pool: &SqlitePool) -> AppResult<Vec<SaleDetail>> {
    let rows = sale::find_all(pool).await?;
    load_details(pool, rows).await
}

/// Sales assigned to a salesman, newest first
pub async fn list_for_salesman(pool: &SqlitePool, salesman_id: i64) -> AppResult<Vec<SaleDetail>> {
    let rows = sale::find_by_salesman(pool, salesman_id).await?;
    load_details(pool, rows).await
}

/// Sales with no salesman yet
pub async fn list_unassigned(pool: &SqlitePool) -> AppResult<Vec<SaleDetail>> {
    let rows = sale::find_unassigned(pool).await?;
    load_details(pool, rows).await
}
