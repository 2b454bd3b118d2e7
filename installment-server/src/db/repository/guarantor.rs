//! Installment Guarantor Repository

use super::RepoResult;
use shared::models::{GuarantorInput, InstallmentGuarantor};
use sqlx::{Executor, Sqlite};

const GUARANTOR_COLUMNS: &str =
    "id, installment_sale_id, name, address, phone, cnic, relationship, created_at";

pub async fn create<'e, E>(
    executor: E,
    sale_id: i64,
    data: &GuarantorInput,
) -> RepoResult<InstallmentGuarantor>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO installment_guarantor (installment_sale_id, name, address, phone, cnic, relationship, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {GUARANTOR_COLUMNS}"
    );
    let row = sqlx::query_as::<_, InstallmentGuarantor>(&sql)
        .bind(sale_id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.cnic)
        .bind(&data.relationship)
        .bind(now)
        .fetch_one(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_sale<'e, E>(executor: E, sale_id: i64) -> RepoResult<Option<InstallmentGuarantor>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql =
        format!("SELECT {GUARANTOR_COLUMNS} FROM installment_guarantor WHERE installment_sale_id = ?");
    let row = sqlx::query_as::<_, InstallmentGuarantor>(&sql)
        .bind(sale_id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}
