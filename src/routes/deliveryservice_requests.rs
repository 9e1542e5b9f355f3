//! Delivery service request routes.
//!
//! Bodies are read as raw bytes so malformed JSON surfaces as the
//! service's payload error rather than an extractor rejection.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};

use crate::db::ExecResult;
use crate::errors::{ApiResponse, AppError};
use crate::models::deliveryservice_request::DeliveryServiceRequest;
use crate::services::deliveryservice_request::{self as dsr_service, RequestFilters};
use crate::AppState;

/// GET /api/v1/deliveryservice_requests -- list requests, optionally filtered.
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<RequestFilters>,
) -> Result<Json<ApiResponse<Vec<DeliveryServiceRequest>>>, AppError> {
    let requests = dsr_service::list(&state.db, &filters).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /api/v1/deliveryservice_requests/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeliveryServiceRequest>>, AppError> {
    let request = dsr_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/v1/deliveryservice_requests -- validate and store a request.
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<DeliveryServiceRequest>>, AppError> {
    let request = dsr_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(request))
}

/// PUT /api/v1/deliveryservice_requests/:id -- validate and replace a request.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<ApiResponse<DeliveryServiceRequest>>, AppError> {
    let request = dsr_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(request))
}

/// DELETE /api/v1/deliveryservice_requests/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ExecResult>>, AppError> {
    let result = dsr_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(result))
}
