use async_trait::async_trait;

use masroufi_assistant::error::AssistantError;
use masroufi_assistant::invoke::AssistantClient;
use masroufi_assistant::proxy::ChatRequest;

/// Anything that can answer one assistant request.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, request: &ChatRequest) -> Result<String, AssistantError>;
}

#[async_trait]
impl Assistant for AssistantClient {
    async fn ask(&self, request: &ChatRequest) -> Result<String, AssistantError> {
        AssistantClient::ask(self, request).await
    }
}
