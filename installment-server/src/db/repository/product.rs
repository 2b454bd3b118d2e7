//! Product Repository

use super::RepoResult;
use shared::models::{Product, ProductCreate};
use sqlx::{Executor, Sqlite};

pub async fn create<'e, E>(executor: E, data: &ProductCreate) -> RepoResult<Product>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, Product>(
        "INSERT INTO product (name, price, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) RETURNING id, name, price",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Product>("SELECT id, name, price FROM product WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}
