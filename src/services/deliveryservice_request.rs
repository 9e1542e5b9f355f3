//! Delivery service request service: validated persistence with change logging.
//!
//! A request must pass [`DeliveryServiceRequest::validate`] before it is
//! written. Every write shares a transaction with its change log entry.

use chrono::Utc;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::{self, ExecResult};
use crate::errors::AppError;
use crate::models::change_log::ChangeAction;
use crate::models::deliveryservice_request::{
    DeliveryServiceRequest, RequestStatus, INSERT_COLUMNS, RESOURCE_TYPE, TABLE, UPDATE_COLUMNS,
};
use crate::services::change_log;

/// Filters for listing requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilters {
    pub status: Option<RequestStatus>,
    pub assignee_id: Option<i64>,
    pub author_id: Option<i64>,
}

/// Deserialize a request body into a delivery service request.
pub fn parse_payload(payload: &[u8]) -> Result<DeliveryServiceRequest, AppError> {
    serde_json::from_slice(payload).map_err(|e| {
        tracing::warn!(error = %e, "Malformed delivery service request payload");
        AppError::Payload(e.to_string())
    })
}

/// Reject a request that breaks any business rule.
pub fn ensure_valid(request: &DeliveryServiceRequest) -> Result<(), AppError> {
    let errors = request.validate();
    if errors.is_empty() {
        return Ok(());
    }
    tracing::warn!(id = request.id(), errors = ?errors, "Delivery service request failed validation");
    Err(AppError::Validation(errors.join("; ")))
}

/// Refuse changes to a request that is already closed.
pub fn ensure_open(existing: &DeliveryServiceRequest) -> Result<(), AppError> {
    if !existing.status.is_closed() {
        return Ok(());
    }
    tracing::warn!(id = existing.id(), status = ?existing.status, "Update of closed delivery service request");
    Err(AppError::InvalidTransition(format!(
        "cannot change a {RESOURCE_TYPE} in '{}' status",
        existing.status.as_str()
    )))
}

async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to begin delivery service request transaction");
        AppError::Database(e)
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), AppError> {
    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to commit delivery service request transaction");
        AppError::Database(e)
    })
}

/// Find a request by id.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<DeliveryServiceRequest, AppError> {
    sqlx::query_as::<_, DeliveryServiceRequest>(
        "SELECT * FROM deliveryservice_request WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch delivery service request");
        AppError::Database(e)
    })?
    .ok_or_else(|| AppError::NotFound(format!("{RESOURCE_TYPE} {id} not found")))
}

/// List requests ordered by id, narrowed by the given filters.
pub async fn list(
    pool: &PgPool,
    filters: &RequestFilters,
) -> Result<Vec<DeliveryServiceRequest>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.status.is_some() {
        param_index += 1;
        conditions.push(format!("status = ${param_index}"));
    }
    if filters.assignee_id.is_some() {
        param_index += 1;
        conditions.push(format!("assignee_id = ${param_index}"));
    }
    if filters.author_id.is_some() {
        param_index += 1;
        conditions.push(format!("author_id = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("SELECT * FROM deliveryservice_request {where_clause} ORDER BY id");

    let mut query = sqlx::query_as::<_, DeliveryServiceRequest>(&sql);
    if let Some(status) = filters.status {
        query = query.bind(status);
    }
    if let Some(assignee_id) = filters.assignee_id {
        query = query.bind(assignee_id);
    }
    if let Some(author_id) = filters.author_id {
        query = query.bind(author_id);
    }

    query.fetch_all(pool).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list delivery service requests");
        AppError::Database(e)
    })
}

/// Validate and insert a request from a request body.
pub async fn create(pool: &PgPool, payload: &[u8]) -> Result<DeliveryServiceRequest, AppError> {
    let request = parse_payload(payload)?;
    ensure_valid(&request)?;

    let mut tx = begin(pool).await?;

    let stored = sqlx::query_as::<_, DeliveryServiceRequest>(&db::insert_sql(
        TABLE,
        INSERT_COLUMNS,
        Some("*"),
    ))
    .bind(request.assignee_id)
    .bind(request.author_id)
    .bind(request.last_edited_by_id)
    .bind(request.change_type)
    .bind(request.status)
    .bind(&request.request)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to insert delivery service request");
        AppError::Database(e)
    })?;

    change_log::record(
        &mut tx,
        ChangeAction::Created,
        stored.resource_type(),
        &stored.audit_name(),
    )
    .await?;

    commit(tx).await?;
    Ok(stored)
}

/// Validate and replace the request at `id`. The path id wins over any id in
/// the body; closed requests cannot be changed. The row stays locked from the
/// status check until commit.
pub async fn update(
    pool: &PgPool,
    id: i64,
    payload: &[u8],
) -> Result<DeliveryServiceRequest, AppError> {
    let mut request = parse_payload(payload)?;
    request.set_id(id);

    let mut tx = begin(pool).await?;

    let existing = sqlx::query_as::<_, DeliveryServiceRequest>(
        "SELECT * FROM deliveryservice_request WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, id, "Failed to lock delivery service request");
        AppError::Database(e)
    })?
    .ok_or_else(|| AppError::NotFound(format!("{RESOURCE_TYPE} {id} not found")))?;

    ensure_open(&existing)?;
    ensure_valid(&request)?;

    let stored = sqlx::query_as::<_, DeliveryServiceRequest>(&format!(
        "{} RETURNING *",
        db::update_sql(TABLE, UPDATE_COLUMNS, "id")
    ))
    .bind(request.assignee_id)
    .bind(request.author_id)
    .bind(request.last_edited_by_id)
    .bind(request.change_type)
    .bind(request.status)
    .bind(&request.request)
    .bind(Utc::now())
    .bind(request.id())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, id, "Failed to update delivery service request");
        AppError::Database(e)
    })?;

    change_log::record(
        &mut tx,
        ChangeAction::Updated,
        stored.resource_type(),
        &stored.audit_name(),
    )
    .await?;

    commit(tx).await?;
    Ok(stored)
}

/// Delete the request at `id`. Deleting an unknown id affects zero rows and
/// leaves no change log entry.
pub async fn delete(pool: &PgPool, id: i64) -> Result<ExecResult, AppError> {
    let mut tx = begin(pool).await?;

    let result = sqlx::query(&db::delete_sql(TABLE, "id"))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to delete delivery service request");
            AppError::Database(e)
        })?;

    if result.rows_affected() > 0 {
        change_log::record(&mut tx, ChangeAction::Deleted, RESOURCE_TYPE, &id.to_string())
            .await?;
    }

    commit(tx).await?;
    Ok(result.into())
}
