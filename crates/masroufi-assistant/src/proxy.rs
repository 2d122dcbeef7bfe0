//! The assistant relay.
//!
//! Takes a prompt and a caller-built context string, forwards them to the
//! chat provider as a fresh two-message conversation, and hands the
//! generated text back untouched. Stateless: concurrent calls share nothing
//! but the provider handle.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::AssistantError;
use crate::prompt::system_prompt;
use crate::upstream::{ChatProvider, CompletionRequest};

/// Incoming invocation body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, user_context: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            user_context: Some(user_context.into()),
        }
    }

    /// The prompt, if present and non-empty.
    pub fn prompt(&self) -> Result<&str, AssistantError> {
        self.prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AssistantError::MissingField("prompt".to_string()))
    }
}

/// Outgoing body: exactly one of `response` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Success { response: String },
    Failure { error: String },
}

impl From<Result<String, AssistantError>> for ChatResponse {
    fn from(result: Result<String, AssistantError>) -> Self {
        match result {
            Ok(response) => ChatResponse::Success { response },
            Err(e) => ChatResponse::Failure {
                error: e.to_string(),
            },
        }
    }
}

/// Relay one prompt to the provider.
///
/// An empty or missing prompt fails before the provider is called. Otherwise
/// exactly one upstream call is made and its text returned unchanged.
pub async fn relay(
    provider: &dyn ChatProvider,
    request: &ChatRequest,
) -> Result<String, AssistantError> {
    let prompt = request.prompt()?;
    let system = system_prompt(request.user_context.as_deref());

    let completion = provider
        .complete(&CompletionRequest::new(system, prompt.to_string()))
        .await
        .inspect_err(|e| error!(error = %e, "assistant relay failed"))?;

    info!(
        prompt_chars = prompt.len(),
        response_chars = completion.text.len(),
        "assistant relay succeeded"
    );

    Ok(completion.text)
}
