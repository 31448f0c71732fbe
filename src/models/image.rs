//! Image payload types shared by the handlers and the Gemini provider.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Content types accepted by the analyze-image endpoint.
pub const SUPPORTED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn is_supported_image_type(mime_type: &str) -> bool {
    SUPPORTED_IMAGE_TYPES.contains(&mime_type)
}

/// An image uploaded for analysis.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Decoded form of a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    /// Parse a data URI, validating both its shape and the base64 payload.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid image format")))?;

        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid image format")))?;

        if mime_type.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid image format: missing MIME type"
            )));
        }

        let data = BASE64.decode(payload).map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Invalid base64 image data: {}", e))
        })?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Render bytes + MIME back into the data URI string form.
    pub fn encode(mime_type: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime_type, BASE64.encode(data))
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Self::encode(&self.mime_type, &self.data))
    }
}
