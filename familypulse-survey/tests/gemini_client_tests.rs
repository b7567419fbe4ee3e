//! Gemini client tests against a mock HTTP server
//!
//! Covers request shape (path, key header, structured output config), reply
//! text extraction, HTTP error mapping, and Smart Fill / summaries running
//! end to end over the real client.

use familypulse_common::config::GeminiConfig;
use familypulse_common::models::{create_draft_record, merge_partial, Gender, MemberRecord};
use familypulse_survey::services::{
    GeminiClient, GenerationError, GenerationRequest, HealthSummarizer, ParseFailure, SmartFill,
    TextGenerator,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
    let config = GeminiConfig {
        base_url: format!("{}/", server.uri()),
        timeout_secs: 5,
        ..GeminiConfig::default()
    };
    GeminiClient::new(&config, api_key.map(str::to_string)).expect("client should build")
}

fn reply_with_parts(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_request_carries_key_and_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "hello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_parts(&["Hi there"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let text = client
        .generate(&GenerationRequest::text("hello"))
        .await
        .unwrap();
    assert_eq!(text, "Hi there");
}

#[tokio::test]
async fn test_structured_request_sends_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_parts(&["{}"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let request = GenerationRequest::structured("describe", json!({ "type": "OBJECT" }));
    assert_eq!(client.generate(&request).await.unwrap(), "{}");
}

#[tokio::test]
async fn test_reply_parts_are_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reply_with_parts(&["{\"name\":", "\"Ana\"}"])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let text = client.generate(&GenerationRequest::text("x")).await.unwrap();
    assert_eq!(text, "{\"name\":\"Ana\"}");
}

#[tokio::test]
async fn test_no_candidates_yields_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let text = client.generate(&GenerationRequest::text("x")).await.unwrap();
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_rejected_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("bad-key"));
    let err = client
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();
    assert_eq!(err, GenerationError::InvalidApiKey(403));
}

#[tokio::test]
async fn test_server_error_body_truncated() {
    let server = MockServer::start().await;
    let long_body = "é".repeat(400);
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(long_body))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    match client.generate(&GenerationRequest::text("x")).await {
        Err(GenerationError::Api(status, body)) => {
            assert_eq!(status, 500);
            assert!(body.len() <= 512);
            assert!(body.chars().all(|c| c == 'é'));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let err = client
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
}

#[tokio::test]
async fn test_missing_key_never_calls_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_parts(&["x"])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert!(!client.is_configured());
    let err = client
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();
    assert_eq!(err, GenerationError::NotConfigured);
}

#[tokio::test]
async fn test_smart_fill_over_gemini() {
    let server = MockServer::start().await;
    let reply = r#"{"name":"John Doe","age":45,"sex":"Male","relationWithHead":"Husband","healthProblems":"Diabetic"}"#;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_parts(&[reply])))
        .mount(&server)
        .await;

    let smart_fill = SmartFill::new(Arc::new(client_for(&server, Some("test-key"))));
    let partial = smart_fill
        .request("John Doe, 45 years old, husband of Jane. He is diabetic.")
        .await
        .unwrap();

    let merged = merge_partial(create_draft_record(1), &partial);
    assert_eq!(merged.name, "John Doe");
    assert_eq!(merged.age, 45);
    assert_eq!(merged.sex, Gender::Male);
    assert_eq!(merged.relation_with_head, "Husband");
    assert_eq!(merged.health_problems, "Diabetic");
    assert_eq!(merged.serial_no, 1);
}

#[tokio::test]
async fn test_smart_fill_over_gemini_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let smart_fill = SmartFill::new(Arc::new(client_for(&server, Some("bad-key"))));
    let err = smart_fill.request("John").await.unwrap_err();
    assert!(matches!(err, ParseFailure::Service { status: 401, .. }));
}

#[tokio::test]
async fn test_summary_over_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reply_with_parts(&["  Household is healthy. "])),
        )
        .mount(&server)
        .await;

    let summarizer = HealthSummarizer::new(Arc::new(client_for(&server, Some("test-key"))));
    let member = MemberRecord {
        name: "Asha".to_string(),
        age: 30,
        ..create_draft_record(1)
    };
    assert_eq!(summarizer.summarize(&[member]).await, "Household is healthy.");
}

#[tokio::test]
async fn test_summary_over_gemini_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let summarizer = HealthSummarizer::new(Arc::new(client_for(&server, Some("test-key"))));
    let member = MemberRecord {
        name: "Asha".to_string(),
        ..create_draft_record(1)
    };
    assert_eq!(
        summarizer.summarize(&[member]).await,
        "Error generating health summary."
    );
}
