//! Hosted chat-completion provider.
//!
//! One request per call: a system message and a user message, fixed model,
//! temperature and token cap. No history, no retries.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AssistantError;

pub const MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

/// Returned to callers when the provider gave no message of its own.
pub const GENERIC_FAILURE: &str = "Failed to get AI response";

// ── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Body of a chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// A stateless two-message request.
    pub fn new(system: String, prompt: String) -> Self {
        Self {
            model: MODEL.to_string(),
            messages: vec![
                Message {
                    role: Role::System,
                    content: system,
                },
                Message {
                    role: Role::User,
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text, exactly as returned by the provider.
    pub text: String,
    pub usage: Option<TokenUsage>,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AssistantError>;
}

// ── OpenAI-compatible provider ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl OpenAiConfig {
    /// Loads config from env vars:
    /// - `OPENAI_API_KEY`  (no default; calls fail without it)
    /// - `OPENAI_BASE_URL` (default: `https://api.openai.com/v1`)
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        Self { base_url, api_key }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ErrorBody>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, AssistantError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AssistantError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential)?;
        let endpoint = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %endpoint, "chat provider unreachable");
                AssistantError::Upstream(GENERIC_FAILURE.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!(error = %e, "failed to read chat provider response");
            AssistantError::Upstream(GENERIC_FAILURE.to_string())
        })?;

        let parsed = serde_json::from_str::<RawResponse>(&text).ok();

        if let Some(error) = parsed.as_ref().and_then(|p| p.error.as_ref()) {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(status = status.as_u16(), %message, "chat provider returned an error");
            return Err(AssistantError::Upstream(message));
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "chat provider returned non-success status");
            return Err(AssistantError::Upstream(GENERIC_FAILURE.to_string()));
        }

        let parsed = parsed.ok_or_else(|| {
            warn!("chat provider response was not valid JSON");
            AssistantError::Upstream(GENERIC_FAILURE.to_string())
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                warn!("chat provider response had no message content");
                AssistantError::Upstream(GENERIC_FAILURE.to_string())
            })?;

        if let Some(usage) = parsed.usage {
            info!(
                model = MODEL,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion"
            );
        }

        Ok(Completion {
            text,
            usage: parsed.usage,
        })
    }
}
