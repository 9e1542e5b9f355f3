//! Delivery service request model and its business-rule validation.
//!
//! A request wraps a proposed delivery-service document. The document is kept
//! as raw JSON for storage; the fields that carry rules are looked up in it
//! directly when validating.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::ValidationError;

/// Resource tag used for audit entries.
pub const RESOURCE_TYPE: &str = "deliveryservice_request";

/// Table holding delivery service requests.
pub const TABLE: &str = "deliveryservice_request";

/// Columns written on insert, in bind order.
pub const INSERT_COLUMNS: &[&str] = &[
    "assignee_id",
    "author_id",
    "last_edited_by_id",
    "change_type",
    "status",
    "deliveryservice",
];

/// Columns written on update, in bind order. The `id` key is bound last.
pub const UPDATE_COLUMNS: &[&str] = &[
    "assignee_id",
    "author_id",
    "last_edited_by_id",
    "change_type",
    "status",
    "deliveryservice",
    "last_updated",
];

static WHITESPACE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s").expect("whitespace pattern compiles"));

/// Kind of change a request proposes for its delivery service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "change_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    #[serde(alias = "CREATE")]
    Create,
    #[serde(alias = "UPDATE")]
    Update,
    #[serde(alias = "DELETE")]
    Delete,
}

/// Workflow state of a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[serde(alias = "DRAFT")]
    Draft,
    #[serde(alias = "SUBMITTED")]
    Submitted,
    #[serde(alias = "REJECTED")]
    Rejected,
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "COMPLETE")]
    Complete,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
            Self::Complete => "complete",
        }
    }

    /// A closed request can no longer be edited.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Complete | Self::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryServiceRequest {
    #[serde(default)]
    pub id: i64,
    pub assignee_id: Option<i64>,
    pub author_id: Option<i64>,
    pub last_edited_by_id: Option<i64>,
    pub change_type: ChangeType,
    pub status: RequestStatus,
    #[serde(rename = "deliveryService", alias = "request", default)]
    #[sqlx(rename = "deliveryservice")]
    pub request: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DeliveryServiceRequest {
    /// Identity of the stored request; 0 before insert.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Replace the identity, e.g. with the id taken from a request path.
    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Name recorded in the change log for this request.
    pub fn audit_name(&self) -> String {
        self.id.to_string()
    }

    /// Resource tag, always `deliveryservice_request`.
    pub fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    /// Check the embedded delivery service against the request rules.
    ///
    /// Every rule runs against the raw document, so a wrongly typed field
    /// never hides another violation. The result lists one
    /// `'<field>' <reason>` message per violation, sorted. An empty list means
    /// the request is valid.
    pub fn validate(&self) -> Vec<String> {
        let Some(document) = self.request.as_object() else {
            return vec!["'deliveryService' is required".to_string()];
        };

        let mut messages: Vec<String> = DOCUMENT_RULES
            .iter()
            .filter_map(|(field, rule)| {
                rule(document.get(*field)).err().map(|e| {
                    let reason = e.message.as_deref().unwrap_or(e.code.as_ref());
                    format!("'{field}' {reason}")
                })
            })
            .collect();
        messages.sort();
        messages
    }
}

/// A check applied to one document field; `None` when the key is absent.
type FieldRule = fn(Option<&serde_json::Value>) -> Result<(), ValidationError>;

/// Document key and the rule it must satisfy.
const DOCUMENT_RULES: &[(&str, FieldRule)] = &[
    ("regionalGeoBlocking", required),
    ("xmlId", no_whitespace),
    ("dscp", required),
    ("displayName", not_blank),
    ("geoProvider", required),
    ("typeId", required),
];

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn required(value: Option<&serde_json::Value>) -> Result<(), ValidationError> {
    if value.is_some_and(|v| !v.is_null()) {
        return Ok(());
    }
    Err(violation("required", "is required"))
}

fn no_whitespace(value: Option<&serde_json::Value>) -> Result<(), ValidationError> {
    match value.and_then(|v| v.as_str()) {
        Some(s) if WHITESPACE.is_match(s) => Err(violation("whitespace", "cannot contain spaces")),
        _ => Ok(()),
    }
}

fn not_blank(value: Option<&serde_json::Value>) -> Result<(), ValidationError> {
    match value.and_then(|v| v.as_str()) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(violation("blank", "cannot be blank")),
    }
}
