//! Database connection pool and column-table SQL builders.
//!
//! Write statements are derived from an explicit, ordered column list per
//! record type. The list order is the bind order: callers bind values in
//! exactly the order the columns appear, followed by the key for updates.

use serde::Serialize;
use sqlx::postgres::{PgPoolOptions, PgQueryResult};
use sqlx::PgPool;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Serializable outcome of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    /// Result of an insert that generated `id`.
    pub fn inserted(id: i64) -> Self {
        Self {
            rows_affected: 1,
            last_insert_id: Some(id),
        }
    }
}

impl From<PgQueryResult> for ExecResult {
    fn from(result: PgQueryResult) -> Self {
        Self {
            rows_affected: result.rows_affected(),
            last_insert_id: None,
        }
    }
}

/// `INSERT INTO <table> (<columns>) VALUES ($1, ..., $n)`, with an optional
/// `RETURNING` clause.
pub fn insert_sql(table: &str, columns: &[&str], returning: Option<&str>) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    let mut sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    if let Some(returning) = returning {
        sql.push_str(" RETURNING ");
        sql.push_str(returning);
    }
    sql
}

/// `UPDATE <table> SET c1 = $1, ..., cn = $n WHERE <key> = $n+1`.
pub fn update_sql(table: &str, columns: &[&str], key: &str) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect();
    format!(
        "UPDATE {table} SET {} WHERE {key} = ${}",
        assignments.join(", "),
        columns.len() + 1
    )
}

/// `DELETE FROM <table> WHERE <key> = $1`.
pub fn delete_sql(table: &str, key: &str) -> String {
    format!("DELETE FROM {table} WHERE {key} = $1")
}
