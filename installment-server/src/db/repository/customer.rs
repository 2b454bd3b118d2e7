//! Customer Repository

use super::RepoResult;
use shared::models::{Customer, CustomerInput};
use sqlx::{Executor, Sqlite};

const CUSTOMER_COLUMNS: &str = "id, name, address, phone, cnic, image, created_at, updated_at";

/// Insert or update keyed on the national id (`cnic`)
///
/// `image = None` keeps the reference already stored for an existing customer.
pub async fn upsert<'e, E>(
    executor: E,
    data: &CustomerInput,
    image: Option<&str>,
) -> RepoResult<Customer>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO customer (name, address, phone, cnic, image, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) \
         ON CONFLICT(cnic) DO UPDATE SET name = excluded.name, address = excluded.address, phone = excluded.phone, \
         image = COALESCE(excluded.image, customer.image), updated_at = excluded.updated_at \
         RETURNING {CUSTOMER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.cnic)
        .bind(image)
        .bind(now)
        .fetch_one(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Customer>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn find_by_cnic<'e, E>(executor: E, cnic: &str) -> RepoResult<Option<Customer>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE cnic = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(cnic)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}
