use deadpool_postgres::Pool;

use crate::error::Result;
use crate::models::icd::Icd;

/// Lists every diagnosis code, ordered by code.
pub async fn list(pool: &Pool) -> Result<Vec<Icd>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            "SELECT id, code, description FROM icd ORDER BY code ASC",
            &[],
        )
        .await?;
    Ok(rows.iter().map(Icd::from).collect())
}

/// Finds a diagnosis code by its id.
pub async fn find_by_id(pool: &Pool, id: i32) -> Result<Option<Icd>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            "SELECT id, code, description FROM icd WHERE id = $1",
            &[&id],
        )
        .await?;
    Ok(row.as_ref().map(Icd::from))
}

/// Checks whether `code` is already taken, optionally ignoring one row
/// (the row being updated).
pub async fn code_exists(pool: &Pool, code: &str, exclude_id: Option<i32>) -> Result<bool> {
    let client = pool.get().await?;
    let row = match exclude_id {
        Some(id) => {
            client
                .query_opt(
                    "SELECT id FROM icd WHERE code = $1 AND id != $2",
                    &[&code, &id],
                )
                .await?
        }
        None => {
            client
                .query_opt("SELECT id FROM icd WHERE code = $1", &[&code])
                .await?
        }
    };
    Ok(row.is_some())
}

/// Inserts a new diagnosis code and returns its id.
pub async fn insert(pool: &Pool, code: &str, description: &str) -> Result<i32> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            "INSERT INTO icd (code, description) VALUES ($1, $2) RETURNING id",
            &[&code, &description],
        )
        .await?;
    Ok(row.get("id"))
}

/// Updates an existing diagnosis code.
pub async fn update(pool: &Pool, id: i32, code: &str, description: &str) -> Result<u64> {
    let client = pool.get().await?;
    let affected = client
        .execute(
            "UPDATE icd SET code = $1, description = $2 WHERE id = $3",
            &[&code, &description, &id],
        )
        .await?;
    Ok(affected)
}

/// Deletes a diagnosis code.
pub async fn delete(pool: &Pool, id: i32) -> Result<u64> {
    let client = pool.get().await?;
    let affected = client
        .execute("DELETE FROM icd WHERE id = $1", &[&id])
        .await?;
    Ok(affected)
}
