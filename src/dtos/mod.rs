use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Bad request: Invalid image format")]
    pub error: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 1000, message = "Prompt must be 1-1000 characters"))]
    #[schema(example = "What is a segment tree?", min_length = 1, max_length = 1000)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    #[schema(example = "A segment tree is a binary tree over array intervals...")]
    pub response: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeImageResponse {
    #[schema(example = "A whiteboard covered in graph diagrams.")]
    pub analysis: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateImageRequest {
    #[validate(length(min = 1, max = 1000, message = "Prompt must be 1-1000 characters"))]
    #[schema(example = "a red cube on a desk", min_length = 1, max_length = 1000)]
    pub prompt: String,

    /// Optional conditioning image as a `data:<mime>;base64,<payload>` URI.
    #[schema(example = "data:image/png;base64,iVBORw0...")]
    pub input_image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateImageResponse {
    /// Id for later retrieval through the stream endpoint.
    pub image_id: Uuid,
    /// The generated image as a data URI, for immediate inline use.
    pub image_base64: String,
}
