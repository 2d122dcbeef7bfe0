//! Client for the deployed assistant relay.

use reqwest::Client;

use crate::error::AssistantError;
use crate::proxy::{ChatRequest, ChatResponse};

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: Client,
    url: String,
    access_token: Option<String>,
}

impl AssistantClient {
    /// `url` is the full address of the relay's assistant route.
    pub fn new(url: impl Into<String>) -> Result<Self, AssistantError> {
        let http = Client::builder()
            .build()
            .map_err(|e| AssistantError::Request(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
            access_token: None,
        })
    }

    /// Loads the relay address from `MASROUFI_ASSISTANT_URL`
    /// (default: `http://localhost:9000/assistant`).
    pub fn from_env() -> Result<Self, AssistantError> {
        let url = std::env::var("MASROUFI_ASSISTANT_URL")
            .unwrap_or_else(|_| "http://localhost:9000/assistant".to_string());
        Self::new(url)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Send one prompt. Validation happens locally so an empty prompt never
    /// leaves the process.
    pub async fn ask(&self, request: &ChatRequest) -> Result<String, AssistantError> {
        request.prompt()?;

        let mut req = self.http.post(&self.url).json(request);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| AssistantError::Request(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Request(e.to_string()))?;

        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(ChatResponse::Success { response }) => Ok(response),
            Ok(ChatResponse::Failure { error }) => Err(AssistantError::Upstream(error)),
            Err(_) => Err(AssistantError::Request(format!(
                "relay returned {status} with an unexpected body"
            ))),
        }
    }
}
