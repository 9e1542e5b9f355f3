//! Regex rule service: CRUD over the `regex` table.
//!
//! Pattern syntax, uniqueness and the `type` reference are not checked here;
//! the schema decides, and its errors surface as datastore failures.

use chrono::Utc;
use sqlx::PgPool;

use crate::db::{self, ExecResult};
use crate::errors::AppError;
use crate::models::regex::{Regex, INSERT_COLUMNS, TABLE, UPDATE_COLUMNS};

/// Deserialize a request body into a regex record.
pub fn parse_payload(payload: &[u8]) -> Result<Regex, AppError> {
    serde_json::from_slice(payload).map_err(|e| {
        tracing::warn!(error = %e, "Malformed regex payload");
        AppError::Payload(e.to_string())
    })
}

/// Build the record written by an update: the path id wins over any id in
/// the body, and the update time is set here.
pub fn prepare_update(id: i64, payload: &[u8]) -> Result<Regex, AppError> {
    let mut regex = parse_payload(payload)?;
    regex.id = id;
    regex.last_updated = Some(Utc::now());
    Ok(regex)
}

/// Fetch the regex with the given id. An unknown id yields an empty list.
pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Vec<Regex>, AppError> {
    sqlx::query_as::<_, Regex>(
        "SELECT id, pattern, type, last_updated FROM regex WHERE id = $1",
    )
    .bind(id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch regex");
        AppError::Database(e)
    })
}

/// Fetch every regex, ordered by id.
pub async fn get_all(pool: &PgPool) -> Result<Vec<Regex>, AppError> {
    sqlx::query_as::<_, Regex>("SELECT id, pattern, type, last_updated FROM regex ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list regexes");
            AppError::Database(e)
        })
}

/// Insert a regex from a request body. Only `pattern` and `type` are written.
pub async fn create(pool: &PgPool, payload: &[u8]) -> Result<ExecResult, AppError> {
    let regex = parse_payload(payload)?;

    let id = sqlx::query_scalar::<_, i64>(&db::insert_sql(TABLE, INSERT_COLUMNS, Some("id")))
        .bind(&regex.pattern)
        .bind(regex.type_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, pattern = %regex.pattern, "Failed to insert regex");
            AppError::Database(e)
        })?;

    Ok(ExecResult::inserted(id))
}

/// Replace the pattern and type of the regex at `id`.
pub async fn update(pool: &PgPool, id: i64, payload: &[u8]) -> Result<ExecResult, AppError> {
    let regex = prepare_update(id, payload)?;

    let result = sqlx::query(&db::update_sql(TABLE, UPDATE_COLUMNS, "id"))
        .bind(&regex.pattern)
        .bind(regex.type_id)
        .bind(regex.last_updated)
        .bind(regex.id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to update regex");
            AppError::Database(e)
        })?;

    Ok(result.into())
}

/// Delete the regex at `id`. Deleting an unknown id affects zero rows.
pub async fn delete(pool: &PgPool, id: i64) -> Result<ExecResult, AppError> {
    let result = sqlx::query(&db::delete_sql(TABLE, "id"))
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to delete regex");
            AppError::Database(e)
        })?;

    Ok(result.into())
}
