use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::dtos::{AnalyzeImageResponse, ErrorResponse, GenerateImageRequest, GenerateImageResponse};
use crate::error::AppError;
use crate::models::{is_supported_image_type, DataUri, UploadedImage, SUPPORTED_IMAGE_TYPES};
use crate::utils::ValidatedJson;
use crate::AppState;

/// Describe an uploaded image
#[utoipa::path(
    post,
    path = "/analyze-image",
    responses(
        (status = 200, description = "Image description", body = AnalyzeImageResponse),
        (status = 400, description = "Missing file or unsupported content type", body = ErrorResponse),
        (status = 401, description = "Invalid or missing API key", body = ErrorResponse),
        (status = 502, description = "Upstream provider failure", body = ErrorResponse)
    ),
    tag = "Images",
    security(("api_key" = []))
)]
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut image: Option<UploadedImage> = None;
    let mut prompt: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        match field.name() {
            Some("prompt") => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read prompt field: {}", e))
                })?;
                if !text.is_empty() {
                    prompt = Some(text);
                }
            }
            _ => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                // Declared content type is checked before any bytes go
                // upstream.
                if !is_supported_image_type(&mime_type) {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "Unsupported image type '{}': expected one of {}",
                        mime_type,
                        SUPPORTED_IMAGE_TYPES.join(", ")
                    )));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                    })?
                    .to_vec();

                image = Some(UploadedImage { mime_type, data });
            }
        }
    }

    let image =
        image.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No image uploaded")))?;

    let analysis = state
        .provider
        .analyze_image(&image, prompt.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(AnalyzeImageResponse { analysis })))
}

/// Generate an image and cache it for later streaming
#[utoipa::path(
    post,
    path = "/generate-image",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Generated image", body = GenerateImageResponse),
        (status = 400, description = "Malformed input image data URI", body = ErrorResponse),
        (status = 401, description = "Invalid or missing API key", body = ErrorResponse),
        (status = 422, description = "Prompt outside 1-1000 characters", body = ErrorResponse),
        (status = 502, description = "Generation failed or no image returned", body = ErrorResponse)
    ),
    tag = "Images",
    security(("api_key" = []))
)]
pub async fn generate_image(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GenerateImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input_image = req
        .input_image
        .as_deref()
        .map(DataUri::parse)
        .transpose()?;

    let generation = state
        .provider
        .generate_image(&req.prompt, input_image.as_ref())
        .await?;

    let image = generation.image.ok_or_else(|| {
        AppError::BadGateway(format!(
            "Failed to generate image: {}",
            generation
                .description
                .unwrap_or_else(|| "no image part in response".to_string())
        ))
    })?;

    let image_base64 = DataUri::encode(&image.mime_type, &image.data);
    let image_id = state.image_cache.store(image.data, image.mime_type);

    tracing::info!(image_id = %image_id, "Cached generated image");

    Ok((
        StatusCode::OK,
        Json(GenerateImageResponse {
            image_id,
            image_base64,
        }),
    ))
}

/// Stream a previously generated image
#[utoipa::path(
    get,
    path = "/generate-image/stream/{image_id}",
    params(("image_id" = Uuid, Path, description = "Id returned by the generation endpoint")),
    responses(
        (status = 200, description = "Raw image bytes with the stored content type"),
        (status = 404, description = "Unknown image id", body = ErrorResponse)
    ),
    tag = "Images"
)]
pub async fn stream_generated_image(
    State(state): State<AppState>,
    Path(image_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let image = state
        .image_cache
        .retrieve(&image_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Image {} not found", image_id)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, image.mime_type)],
        image.data,
    )
        .into_response())
}
