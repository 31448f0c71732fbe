use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Shared-secret gate for the functional endpoints.
///
/// The ping, health and image-stream endpoints are deliberately left
/// outside this layer.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let api_key = headers
        .get("X-API-Key")
        .and_then(|value| value.to_str().ok());

    match api_key {
        Some(key) if key == state.config.auth.api_key => next.run(request).await,
        _ => {
            tracing::warn!("Request rejected: invalid or missing API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized: Invalid or missing API key" })),
            )
                .into_response()
        }
    }
}
