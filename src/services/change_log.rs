//! Change log service: writes and lists audit entries for API changes.

use sqlx::{PgConnection, PgPool};

use crate::db;
use crate::errors::AppError;
use crate::models::change_log::{
    ChangeAction, ChangeLogEntry, ChangeLogQuery, API_CHANGE_LEVEL, INSERT_COLUMNS, TABLE,
};

/// Format the message stored for a change, e.g.
/// `deliveryservice_request: 10, ACTION: Created deliveryservice_request`.
pub fn change_message(action: ChangeAction, resource_type: &str, audit_name: &str) -> String {
    format!(
        "{resource_type}: {audit_name}, ACTION: {} {resource_type}",
        action.as_str()
    )
}

/// Record a change on the given connection, typically inside the
/// transaction that made the change.
pub async fn record(
    conn: &mut PgConnection,
    action: ChangeAction,
    resource_type: &str,
    audit_name: &str,
) -> Result<(), AppError> {
    let message = change_message(action, resource_type, audit_name);

    sqlx::query(&db::insert_sql(TABLE, INSERT_COLUMNS, None))
        .bind(API_CHANGE_LEVEL)
        .bind(&message)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %message, "Failed to write change log entry");
            AppError::Database(e)
        })?;

    tracing::info!(%message, "Change recorded");
    Ok(())
}

/// List the most recent change log entries, newest first.
pub async fn list(pool: &PgPool, query: &ChangeLogQuery) -> Result<Vec<ChangeLogEntry>, AppError> {
    let entries = sqlx::query_as::<_, ChangeLogEntry>(
        "SELECT id, level, message, created_at FROM change_log \
         ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(query.limit())
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to list change log");
        AppError::Database(e)
    })?;

    Ok(entries)
}
