use crate::infra::{AppState, PlatformServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use youthbridge::workflows::directory::directory_router;
use youthbridge::workflows::opportunities::applications::application_router;
use youthbridge::workflows::opportunities::opportunity_router;
use youthbridge::workflows::verification::verification_router;

/// Compose every workflow router with the operational endpoints.
pub(crate) fn platform_routes(services: &PlatformServices) -> axum::Router {
    directory_router(services.directory.clone())
        .merge(verification_router(services.verification.clone()))
        .merge(opportunity_router(services.opportunities.clone()))
        .merge(application_router(services.applications.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
