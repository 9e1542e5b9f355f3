//! Route definitions for the CDN control-plane API.

pub mod change_logs;
pub mod deliveryservice_requests;
pub mod health;
pub mod regexes;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let origin = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(error = %e, url = %state.config.frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            AllowOrigin::any()
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let regex_routes = Router::new()
        .route("/regexes", get(regexes::list).post(regexes::create))
        .route(
            "/regexes/{id}",
            get(regexes::get_by_id)
                .put(regexes::update)
                .delete(regexes::delete),
        );

    let request_routes = Router::new()
        .route(
            "/deliveryservice_requests",
            get(deliveryservice_requests::list).post(deliveryservice_requests::create),
        )
        .route(
            "/deliveryservice_requests/{id}",
            get(deliveryservice_requests::get_by_id)
                .put(deliveryservice_requests::update)
                .delete(deliveryservice_requests::delete),
        );

    let log_routes = Router::new().route("/change_logs", get(change_logs::list));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(
            "/api/v1",
            regex_routes.merge(request_routes).merge(log_routes),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
