use std::sync::Arc;

use masroufi_assistant::upstream::{ChatProvider, OpenAiProvider};

use crate::config::LambdaConfig;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Nothing in here is mutable: concurrent requests only share the provider
/// handle and configuration.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub jwt_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            jwt_secret: None,
        }
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<Arc<str>>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn from_config(config: LambdaConfig) -> eyre::Result<Self> {
        let provider = OpenAiProvider::new(config.openai)?;
        let mut state = Self::new(Arc::new(provider));
        if let Some(secret) = config.jwt_secret {
            state = state.with_jwt_secret(secret);
        }
        Ok(state)
    }
}
