use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "Observability"
)]
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "ai-gateway",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Connectivity check for clients
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Pong")),
    tag = "Observability"
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "pong" })))
}
