use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dtos::{ChatRequest, ChatResponse, ErrorResponse};
use crate::error::AppError;
use crate::utils::ValidatedJson;
use crate::AppState;

/// Send the next turn of the shared conversation
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model reply", body = ChatResponse),
        (status = 401, description = "Invalid or missing API key", body = ErrorResponse),
        (status = 422, description = "Prompt outside 1-1000 characters", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse)
    ),
    tag = "Chat",
    security(("api_key" = []))
)]
pub async fn chat(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.provider.chat(&req.prompt).await?;
    Ok((StatusCode::OK, Json(ChatResponse { response })))
}

/// Reset the shared conversation to its seed state
#[utoipa::path(
    post,
    path = "/chat/reset",
    responses(
        (status = 200, description = "Session reset"),
        (status = 401, description = "Invalid or missing API key", body = ErrorResponse)
    ),
    tag = "Chat",
    security(("api_key" = []))
)]
pub async fn reset_chat(State(state): State<AppState>) -> impl IntoResponse {
    state.provider.reset_chat().await;
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Chat session reset" })),
    )
}
