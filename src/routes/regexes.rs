//! Regex rule routes: CRUD over URL-matching patterns.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::db::ExecResult;
use crate::errors::{ApiResponse, AppError};
use crate::models::regex::Regex;
use crate::services::regex as regex_service;
use crate::AppState;

/// GET /api/v1/regexes -- list all regex rules.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Regex>>>, AppError> {
    let regexes = regex_service::get_all(&state.db).await?;
    Ok(ApiResponse::success(regexes))
}

/// GET /api/v1/regexes/:id -- matching rules, empty when the id is unknown.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Regex>>>, AppError> {
    let regexes = regex_service::get_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(regexes))
}

/// POST /api/v1/regexes -- insert a rule from the raw JSON body.
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<ExecResult>>, AppError> {
    let result = regex_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(result))
}

/// PUT /api/v1/regexes/:id -- replace a rule; the path id wins over the body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<ApiResponse<ExecResult>>, AppError> {
    let result = regex_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(result))
}

/// DELETE /api/v1/regexes/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ExecResult>>, AppError> {
    let result = regex_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(result))
}
