//! Shared test harness: spawns the gateway on a random port, pointed at
//! a stubbed upstream.

use ai_gateway::config::{AuthConfig, CacheConfig, GatewayConfig, GeminiSettings, ServerConfig};
use ai_gateway::startup::Application;
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    /// Spawn the gateway against the given upstream base URL (usually a
    /// wiremock server).
    pub async fn spawn(upstream_base: &str) -> Self {
        let config = GatewayConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
                debug: false,
            },
            auth: AuthConfig {
                api_key: TEST_API_KEY.to_string(),
            },
            gemini: GeminiSettings {
                api_key: "test-gemini-key".to_string(),
                api_base: upstream_base.to_string(),
                chat_model: "gemini-2.0-flash".to_string(),
                vision_model: "gemini-2.0-flash".to_string(),
                image_model: "gemini-2.0-flash-exp-image-generation".to_string(),
            },
            cache: CacheConfig { capacity: 16 },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up by polling the health endpoint.
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
        }
    }
}

/// Gemini-shaped response carrying a single text part.
#[allow(dead_code)]
pub fn text_candidate(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Gemini-shaped response carrying a text part and an inline image part.
#[allow(dead_code)]
pub fn image_candidate(text: &str, mime_type: &str, base64_data: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": text },
                    { "inlineData": { "mimeType": mime_type, "data": base64_data } }
                ]
            },
            "finishReason": "STOP"
        }]
    })
}
