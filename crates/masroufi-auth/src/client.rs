use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use crate::error::AuthError;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
}

impl AuthConfig {
    /// Loads config from env vars:
    /// - `MASROUFI_BACKEND_URL` (default: `http://localhost:54321`)
    /// - `MASROUFI_ANON_KEY`    (default: empty)
    pub fn from_env() -> Self {
        let url = std::env::var("MASROUFI_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());
        let anon_key = std::env::var("MASROUFI_ANON_KEY").unwrap_or_default();
        Self { url, anon_key }
    }
}

/// HTTP client for the hosted auth API (`{url}/auth/v1/...`).
#[derive(Debug, Clone)]
pub struct AuthClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.anon_key)
                .map_err(|e| AuthError::AuthFailed(format!("invalid anon key: {e}")))?,
        );

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }
}
