//! Liveness and auth-gate tests.

mod common;

use common::{TestApp, TEST_API_KEY};
use reqwest::Client;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn("http://127.0.0.1:1").await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "ai-gateway");
}

#[tokio::test]
async fn ping_answers_pong_without_auth() {
    let app = TestApp::spawn("http://127.0.0.1:1").await;

    let response = Client::new()
        .get(format!("{}/ping", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "pong");
}

#[tokio::test]
async fn functional_endpoints_require_the_api_key() {
    let app = TestApp::spawn("http://127.0.0.1:1").await;
    let client = Client::new();

    // Missing key.
    let response = client
        .post(format!("{}/chat", app.address))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 401);

    // Wrong key.
    let response = client
        .post(format!("{}/chat", app.address))
        .header("X-API-Key", "not-the-key")
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 401);

    // Reset endpoint sits behind the same gate.
    let response = client
        .post(format!("{}/chat/reset", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn openapi_json_is_served() {
    let app = TestApp::spawn("http://127.0.0.1:1").await;

    let response = Client::new()
        .get(format!("{}/.well-known/openapi.json", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["paths"]["/chat"].is_object());
    assert!(body["paths"]["/generate-image/stream/{image_id}"].is_object());
}

#[tokio::test]
async fn valid_key_passes_the_gate() {
    // Upstream is unreachable, so a chat with a valid key must fail with
    // a gateway error rather than 401.
    let app = TestApp::spawn("http://127.0.0.1:1").await;

    let response = Client::new()
        .post(format!("{}/chat", app.address))
        .header("X-API-Key", TEST_API_KEY)
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 502);
}
