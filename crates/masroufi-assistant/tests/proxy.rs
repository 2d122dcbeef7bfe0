use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use masroufi_assistant::error::AssistantError;
use masroufi_assistant::prompt::NO_CONTEXT;
use masroufi_assistant::proxy::{relay, ChatRequest, ChatResponse};
use masroufi_assistant::upstream::{
    ChatProvider, Completion, CompletionRequest, Role, MAX_TOKENS, TEMPERATURE,
};

/// Records every request and answers with a fixed reply or error.
struct Recorder {
    calls: Mutex<Vec<CompletionRequest>>,
    reply: Result<String, String>,
}

impl Recorder {
    fn ok(text: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        }
    }

    fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for Recorder {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AssistantError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(Completion {
                text: text.clone(),
                usage: None,
            }),
            Err(message) => Err(AssistantError::Upstream(message.clone())),
        }
    }
}

/// Replies with the system message it was given, after a delay taken from
/// the prompt.
struct Echo;

#[async_trait]
impl ChatProvider for Echo {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AssistantError> {
        let delay: u64 = request.messages[1].content.parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(Completion {
            text: request.system().unwrap_or_default().to_string(),
            usage: None,
        })
    }
}

#[tokio::test]
async fn missing_or_empty_prompt_makes_no_upstream_call() {
    let provider = Recorder::ok("unused");

    for request in [
        ChatRequest::default(),
        ChatRequest::new("", "Currency: MAD"),
    ] {
        let err = relay(&provider, &request).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "missing required field: prompt");
    }

    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn one_stateless_call_with_system_and_user_messages() {
    let provider = Recorder::ok("Try the 50/30/20 rule.");
    let request = ChatRequest::new("How can I save money?", "Currency: MAD\n");

    relay(&provider, &request).await.unwrap();
    relay(&provider, &request).await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.messages.len(), 2);
        assert_eq!(call.messages[0].role, Role::System);
        assert!(call.messages[0].content.contains("Currency: MAD\n"));
        assert_eq!(call.messages[1].role, Role::User);
        assert_eq!(call.messages[1].content, "How can I save money?");
        assert_eq!(call.temperature, TEMPERATURE);
        assert_eq!(call.max_tokens, MAX_TOKENS);
    }
}

#[tokio::test]
async fn empty_context_sends_placeholder_and_returns_text_unmodified() {
    let reply = "  Start by tracking every expense.\n";
    let provider = Recorder::ok(reply);
    let request = ChatRequest::new("How can I save money?", "");

    let response = relay(&provider, &request).await.unwrap();

    assert_eq!(response, reply);
    assert!(provider.calls()[0].messages[0].content.contains(NO_CONTEXT));
}

#[tokio::test]
async fn upstream_error_becomes_error_response() {
    let provider = Recorder::failing("Rate limit reached for requests");
    let request = ChatRequest::new("Hello", "");

    let response = ChatResponse::from(relay(&provider, &request).await);

    assert_eq!(
        response,
        ChatResponse::Failure {
            error: "Rate limit reached for requests".to_string()
        }
    );
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({ "error": "Rate limit reached for requests" })
    );
}

#[tokio::test]
async fn success_serializes_with_response_field_only() {
    let response = ChatResponse::from(Ok::<_, AssistantError>("hi".to_string()));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({ "response": "hi" })
    );
}

#[tokio::test]
async fn concurrent_calls_do_not_leak_context() {
    let provider = Echo;
    // The first request finishes last.
    let a = ChatRequest::new("40", "context-for-alice");
    let b = ChatRequest::new("5", "context-for-bob");

    let (ra, rb) = tokio::join!(relay(&provider, &a), relay(&provider, &b));
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert!(ra.contains("context-for-alice"));
    assert!(!ra.contains("context-for-bob"));
    assert!(rb.contains("context-for-bob"));
    assert!(!rb.contains("context-for-alice"));
}

#[test]
fn request_accepts_camel_case_body_without_context() {
    let request: ChatRequest =
        serde_json::from_str(r#"{ "prompt": "Hi", "userContext": "ctx" }"#).unwrap();
    assert_eq!(request.user_context.as_deref(), Some("ctx"));

    let request: ChatRequest = serde_json::from_str(r#"{ "prompt": "Hi" }"#).unwrap();
    assert_eq!(request.user_context, None);
    assert_eq!(request.prompt().unwrap(), "Hi");
}
