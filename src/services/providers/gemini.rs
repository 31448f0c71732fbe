//! Gemini provider implementation.
//!
//! Talks to Google's Gemini REST API for chat (with a shared,
//! process-wide conversation history), image analysis and image
//! generation. Image generation goes through the same REST surface but a
//! different model, since that model is not exposed through the
//! conversational endpoint family.

use super::{GeneratedImage, GenerativeProvider, ImageGeneration, ProviderError};
use crate::config::GeminiSettings;
use crate::models::{ChatSession, DataUri, UploadedImage};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Instruction prefixed to every chat prompt before it enters the
/// session history.
const CHAT_PROMPT_PREFIX: &str = "Reply in plain text without markdown formatting: ";

/// Quality suffix appended to every image-generation prompt.
const IMAGE_PROMPT_SUFFIX: &str = ", high quality, highly detailed, sharp focus";

/// Prompt used for image analysis when the caller supplies none.
const DEFAULT_ANALYSIS_PROMPT: &str = "Describe this image in detail.";

/// Fixed sampling parameters for image generation.
const IMAGE_TEMPERATURE: f64 = 1.0;
const IMAGE_TOP_P: f64 = 0.95;
const IMAGE_TOP_K: i32 = 40;

/// Gemini provider.
///
/// The chat session lives behind a mutex that is held across the whole
/// upstream exchange, so concurrent chat requests serialize instead of
/// interleaving history.
pub struct GeminiProvider {
    settings: GeminiSettings,
    client: Client,
    session: Mutex<ChatSession>,
}

impl GeminiProvider {
    pub fn new(settings: GeminiSettings) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            settings,
            client,
            session: Mutex::new(ChatSession::seeded()),
        }
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.settings.api_base, model, method, self.settings.api_key
        )
    }

    /// POST a generateContent request and decode the response.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.api_url(model, "generateContent");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn chat(&self, prompt: &str) -> Result<String, ProviderError> {
        // Held across the upstream call: serializes chat requests.
        let mut session = self.session.lock().await;

        let message = format!("{}{}", CHAT_PROMPT_PREFIX, prompt);
        let mut contents: Vec<Content> = session
            .turns()
            .iter()
            .map(|turn| Content::text(turn.role.as_str(), turn.text.clone()))
            .collect();
        contents.push(Content::text("user", message.clone()));

        let request = GenerateContentRequest {
            contents,
            generation_config: None,
        };

        tracing::debug!(
            model = %self.settings.chat_model,
            prompt_len = prompt.len(),
            history_turns = session.len(),
            "Sending chat request to Gemini API"
        );

        let response = self
            .generate_content(&self.settings.chat_model, &request)
            .await?;

        let reply = first_text(&response).ok_or_else(|| {
            ProviderError::ApiError("Gemini response contained no text part".to_string())
        })?;

        session.push_exchange(message, reply.clone());
        Ok(reply)
    }

    async fn reset_chat(&self) {
        let mut session = self.session.lock().await;
        session.reset();
        tracing::info!("Chat session reset");
    }

    async fn analyze_image(
        &self,
        image: &UploadedImage,
        prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    ContentPart::Text {
                        text: prompt.unwrap_or(DEFAULT_ANALYSIS_PROMPT).to_string(),
                    },
                    ContentPart::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: BASE64.encode(&image.data),
                        },
                    },
                ],
            }],
            generation_config: None,
        };

        tracing::debug!(
            model = %self.settings.vision_model,
            mime_type = %image.mime_type,
            image_bytes = image.data.len(),
            "Sending image analysis request to Gemini API"
        );

        let response = self
            .generate_content(&self.settings.vision_model, &request)
            .await?;

        first_text(&response).ok_or_else(|| {
            ProviderError::ApiError("Gemini response contained no text part".to_string())
        })
    }

    async fn generate_image(
        &self,
        prompt: &str,
        input_image: Option<&DataUri>,
    ) -> Result<ImageGeneration, ProviderError> {
        let mut parts = vec![ContentPart::Text {
            text: format!("{}{}", prompt, IMAGE_PROMPT_SUFFIX),
        }];

        if let Some(image) = input_image {
            parts.push(ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: BASE64.encode(&image.data),
                },
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(IMAGE_TEMPERATURE),
                top_p: Some(IMAGE_TOP_P),
                top_k: Some(IMAGE_TOP_K),
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            }),
        };

        tracing::debug!(
            model = %self.settings.image_model,
            prompt_len = prompt.len(),
            has_input_image = input_image.is_some(),
            "Sending image generation request to Gemini API"
        );

        let response = self
            .generate_content(&self.settings.image_model, &request)
            .await?;

        let description = first_text(&response);

        let image = match first_inline_image(&response) {
            Some((mime_type, payload)) => {
                let data = BASE64.decode(payload).map_err(|e| {
                    ProviderError::ApiError(format!("Invalid base64 in image part: {}", e))
                })?;
                Some(GeneratedImage { data, mime_type })
            }
            None => None,
        };

        Ok(ImageGeneration { image, description })
    }
}

/// First text part across all candidates, if any.
fn first_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .flat_map(|c| c.content.parts.iter())
        .find_map(|p| match p {
            ContentPart::Text { text } => Some(text.clone()),
            _ => None,
        })
}

/// First inline-image part across all candidates, as (mime, base64).
fn first_inline_image(response: &GenerateContentResponse) -> Option<(String, String)> {
    response
        .candidates
        .iter()
        .flat_map(|c| c.content.parts.iter())
        .find_map(|p| match p {
            ContentPart::InlineData { inline_data } => {
                Some((inline_data.mime_type.clone(), inline_data.data.clone()))
            }
            _ => None,
        })
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

impl Content {
    fn text(role: &str, text: String) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![ContentPart::Text { text }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}
