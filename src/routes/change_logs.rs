//! Change log routes.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::change_log::{ChangeLogEntry, ChangeLogQuery};
use crate::services::change_log;
use crate::AppState;

/// GET /api/v1/change_logs?limit= -- most recent entries first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ChangeLogQuery>,
) -> Result<Json<ApiResponse<Vec<ChangeLogEntry>>>, AppError> {
    let entries = change_log::list(&state.db, &query).await?;
    Ok(ApiResponse::success(entries))
}
