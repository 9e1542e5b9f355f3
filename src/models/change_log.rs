//! Change log model: audit trail of persisted API changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Table holding change log entries.
pub const TABLE: &str = "change_log";

/// Columns written on insert, in bind order.
pub const INSERT_COLUMNS: &[&str] = &["level", "message"];

/// Level recorded for changes made through the API.
pub const API_CHANGE_LEVEL: &str = "APICHANGE";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    pub id: i64,
    pub level: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Kind of change recorded against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        }
    }
}

/// Query parameters for listing change log entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeLogQuery {
    pub limit: Option<i64>,
}

impl ChangeLogQuery {
    const DEFAULT_LIMIT: i64 = 100;
    const MAX_LIMIT: i64 = 1000;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
