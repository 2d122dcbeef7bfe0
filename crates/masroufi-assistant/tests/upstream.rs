//! `OpenAiProvider` against a local stand-in for the chat-completion API.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use masroufi_assistant::error::AssistantError;
use masroufi_assistant::upstream::{
    ChatProvider, CompletionRequest, OpenAiConfig, OpenAiProvider, GENERIC_FAILURE, MODEL,
};

/// The prompt selects the behaviour of the fake provider.
async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, String) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
        return (
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } })
                .to_string(),
        );
    }

    assert_eq!(body["model"], MODEL);
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));

    match body["messages"][1]["content"].as_str().unwrap_or_default() {
        "error-payload" => (
            StatusCode::OK,
            json!({ "error": { "message": "The model is overloaded" } }).to_string(),
        ),
        "server-error" => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>".to_string()),
        "no-choices" => (StatusCode::OK, json!({ "choices": [] }).to_string()),
        prompt => (
            StatusCode::OK,
            json!({
                "choices": [{ "message": { "role": "assistant", "content": format!(" echo: {prompt} ") } }],
                "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
            })
            .to_string(),
        ),
    }
}

async fn provider(api_key: Option<&str>) -> OpenAiProvider {
    let app = Router::new().route("/v1/chat/completions", post(completions));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    OpenAiProvider::new(OpenAiConfig {
        base_url: format!("http://{addr}/v1/"),
        api_key: api_key.map(str::to_string),
    })
    .unwrap()
}

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest::new("system".to_string(), prompt.to_string())
}

#[tokio::test]
async fn success_returns_choice_text_unchanged() {
    let provider = provider(Some("sk-test")).await;

    let completion = provider.complete(&request("budget tips")).await.unwrap();

    assert_eq!(completion.text, " echo: budget tips ");
    assert_eq!(completion.usage.map(|u| u.total_tokens), Some(49));
}

#[tokio::test]
async fn provider_message_is_forwarded() {
    let provider = provider(Some("sk-test")).await;

    let err = provider.complete(&request("error-payload")).await.unwrap_err();
    assert_eq!(err.to_string(), "The model is overloaded");

    let wrong_key = self::provider(Some("sk-wrong")).await;
    let err = wrong_key.complete(&request("hi")).await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect API key provided");
}

#[tokio::test]
async fn opaque_failures_use_generic_message() {
    let provider = provider(Some("sk-test")).await;

    for prompt in ["server-error", "no-choices"] {
        let err = provider.complete(&request(prompt)).await.unwrap_err();
        assert!(matches!(err, AssistantError::Upstream(ref m) if m == GENERIC_FAILURE));
    }
}

#[tokio::test]
async fn missing_credential_fails_without_network() {
    let provider = OpenAiProvider::new(OpenAiConfig {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        api_key: None,
    })
    .unwrap();

    let err = provider.complete(&request("hi")).await.unwrap_err();

    assert!(matches!(err, AssistantError::MissingCredential));
}

#[tokio::test]
async fn unreachable_provider_is_generic_failure() {
    let provider = OpenAiProvider::new(OpenAiConfig {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        api_key: Some("sk-test".to_string()),
    })
    .unwrap();

    let err = provider.complete(&request("hi")).await.unwrap_err();

    assert_eq!(err.to_string(), GENERIC_FAILURE);
}
