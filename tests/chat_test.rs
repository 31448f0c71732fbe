//! Chat contract tests against a stubbed upstream.

mod common;

use common::{text_candidate, TestApp, TEST_API_KEY};
use reqwest::Client;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn chat_returns_the_model_reply() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_candidate("A segment tree is a binary tree.")),
        )
        .mount(&mock_server)
        .await;

    let app = TestApp::spawn(&mock_server.uri()).await;

    let response = Client::new()
        .post(format!("{}/chat", app.address))
        .header("X-API-Key", TEST_API_KEY)
        .json(&serde_json::json!({ "prompt": "What is a segment tree?" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["response"], "A segment tree is a binary tree.");
}

#[tokio::test]
async fn out_of_bounds_prompts_never_reach_the_upstream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_candidate("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = TestApp::spawn(&mock_server.uri()).await;
    let client = Client::new();

    // Empty prompt.
    let response = client
        .post(format!("{}/chat", app.address))
        .header("X-API-Key", TEST_API_KEY)
        .json(&serde_json::json!({ "prompt": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 422);

    // Prompt over 1000 characters.
    let response = client
        .post(format!("{}/chat", app.address))
        .header("X-API-Key", TEST_API_KEY)
        .json(&serde_json::json!({ "prompt": "x".repeat(1001) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn upstream_errors_surface_as_bad_gateway_with_the_provider_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exhausted"))
        .mount(&mock_server)
        .await;

    let app = TestApp::spawn(&mock_server.uri()).await;

    let response = Client::new()
        .post(format!("{}/chat", app.address))
        .header("X-API-Key", TEST_API_KEY)
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("500"), "error should carry the status: {error}");
    assert!(
        error.contains("quota exhausted"),
        "error should carry the provider body: {error}"
    );
}

#[tokio::test]
async fn session_history_grows_across_calls_and_reset_restores_the_seed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_candidate("ok")))
        .mount(&mock_server)
        .await;

    let app = TestApp::spawn(&mock_server.uri()).await;
    let client = Client::new();

    let chat = |prompt: &str| {
        client
            .post(format!("{}/chat", app.address))
            .header("X-API-Key", TEST_API_KEY)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
    };

    assert!(chat("first").await.unwrap().status().is_success());
    assert!(chat("second").await.unwrap().status().is_success());

    let reset = client
        .post(format!("{}/chat/reset", app.address))
        .header("X-API-Key", TEST_API_KEY)
        .send()
        .await
        .expect("Failed to send request");
    assert!(reset.status().is_success());

    assert!(chat("third").await.unwrap().status().is_success());

    // Inspect what actually went over the wire: seed pair (2 turns) plus
    // the new user turn on the first call, the whole history on the
    // second, and the seed pair again after the reset.
    let requests = mock_server
        .received_requests()
        .await
        .expect("request recording enabled");
    let turn_counts: Vec<usize> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["contents"].as_array().unwrap().len()
        })
        .collect();

    assert_eq!(turn_counts, vec![3, 5, 3]);
}
