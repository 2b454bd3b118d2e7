//! Salesman Repository

use super::RepoResult;
use shared::models::{Salesman, SalesmanCreate};
use sqlx::{Executor, Sqlite};

pub async fn create<'e, E>(executor: E, data: &SalesmanCreate) -> RepoResult<Salesman>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, Salesman>(
        "INSERT INTO salesman (name, email, is_active, created_at, updated_at) VALUES (?1, ?2, 1, ?3, ?3) RETURNING id, name, email",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

/// Active salesmen, ordered by name
pub async fn find_all<'e, E>(executor: E) -> RepoResult<Vec<Salesman>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, Salesman>(
        "SELECT id, name, email FROM salesman WHERE is_active = 1 ORDER BY name, id",
    )
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Salesman>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Salesman>(
        "SELECT id, name, email FROM salesman WHERE id = ? AND is_active = 1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Touch the given active salesmen; inside a transaction this takes the write lock
///
/// Returns how many rows matched, so callers can detect unknown ids.
pub async fn touch_many<'e, E>(executor: E, ids: &[i64]) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let now = shared::util::now_millis();
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "UPDATE salesman SET updated_at = ? WHERE is_active = 1 AND id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql).bind(now);
    for id in ids {
        query = query.bind(*id);
    }
    let rows = query.execute(executor).await?;
    Ok(rows.rows_affected())
}
