//! URL-matching regex rule model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Table holding regex rules.
pub const TABLE: &str = "regex";

/// Columns written on insert, in bind order.
pub const INSERT_COLUMNS: &[&str] = &["pattern", "type"];

/// Columns written on update, in bind order. The `id` key is bound last.
pub const UPDATE_COLUMNS: &[&str] = &["pattern", "type", "last_updated"];

/// A stored URL pattern with its type classification.
///
/// `id` and `last_updated` are server-owned: they deserialize when present in
/// a request body but are never taken from it on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Regex {
    #[serde(default)]
    pub id: i64,
    pub pattern: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub type_id: i64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}
