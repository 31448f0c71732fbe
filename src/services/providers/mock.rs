//! Mock provider for exercising handlers without network access.

use super::{GeneratedImage, GenerativeProvider, ImageGeneration, ProviderError};
use crate::models::{DataUri, UploadedImage};
use async_trait::async_trait;

/// Canned-response provider.
pub struct MockProvider {
    reply: String,
    image: Option<GeneratedImage>,
}

impl MockProvider {
    /// Provider answering every text request with `reply` and every
    /// generation request with no image.
    pub fn text_only(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            image: None,
        }
    }

    /// Provider that also returns the given image bytes on generation.
    pub fn with_image(reply: &str, data: Vec<u8>, mime_type: &str) -> Self {
        Self {
            reply: reply.to_string(),
            image: Some(GeneratedImage {
                data,
                mime_type: mime_type.to_string(),
            }),
        }
    }
}

#[async_trait]
impl GenerativeProvider for MockProvider {
    async fn chat(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(self.reply.clone())
    }

    async fn reset_chat(&self) {}

    async fn analyze_image(
        &self,
        _image: &UploadedImage,
        _prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        Ok(self.reply.clone())
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _input_image: Option<&DataUri>,
    ) -> Result<ImageGeneration, ProviderError> {
        Ok(ImageGeneration {
            image: self.image.clone(),
            description: Some(self.reply.clone()),
        })
    }
}
