//! Upstream AI provider abstraction.
//!
//! A trait-based seam over the generative backend so handlers can be
//! exercised against a mock without network access.

pub mod gemini;
pub mod mock;

use crate::models::UploadedImage;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A generated image decoded from an inline-image response part.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Outcome of an image-generation call.
///
/// The model may answer with text only; an absent image is a valid
/// provider-level outcome and is turned into an HTTP error by the
/// handler, not here.
#[derive(Debug, Clone)]
pub struct ImageGeneration {
    pub image: Option<GeneratedImage>,
    /// Text the model produced alongside (or instead of) the image.
    pub description: Option<String>,
}

/// Upstream generative AI client.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Send the next turn of the shared chat session and return the
    /// model's reply. Appends both turns to the session on success.
    async fn chat(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Replace the shared chat session with a freshly seeded one.
    async fn reset_chat(&self);

    /// Describe an uploaded image, optionally steered by a prompt.
    async fn analyze_image(
        &self,
        image: &UploadedImage,
        prompt: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// Generate an image from a prompt, optionally conditioned on an
    /// input image.
    async fn generate_image(
        &self,
        prompt: &str,
        input_image: Option<&crate::models::DataUri>,
    ) -> Result<ImageGeneration, ProviderError>;
}
