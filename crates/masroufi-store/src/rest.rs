//! PostgREST-style HTTP backend.
//!
//! Talks to the hosted data API at `{url}/rest/v1/{table}`. Row-level
//! ownership is enforced server-side from the bearer token; the owner filter
//! sent here only narrows the result set.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{Backend, Table};
use crate::error::StorageError;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
}

impl StoreConfig {
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

#[derive(Debug, Clone)]
pub struct RestBackend {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

/// Error body returned by the data API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RestBackend {
    pub fn new(config: StoreConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            access_token: None,
        })
    }

    /// Act on behalf of a signed-in user instead of the anonymous role.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn endpoint(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        req.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    /// Send the request and decode the JSON array the data API returns.
    async fn send_rows(&self, table: Table, req: RequestBuilder) -> Result<Vec<Value>, StorageError> {
        let response = self.authorize(req).send().await?;
        let response = check_status(table, response).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }
}

async fn check_status(table: Table, response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("request failed with status {status}"));

    tracing::warn!(table = %table, status = status.as_u16(), %message, "backend request failed");

    Err(StorageError::Backend {
        status: status.as_u16(),
        message,
    })
}

fn single(table: Table, rows: Vec<Value>) -> Result<Value, StorageError> {
    rows.into_iter().next().ok_or_else(|| StorageError::EmptyResponse {
        table: table.to_string(),
    })
}

/// `id = X`, narrowed to `owner` on owned tables.
fn row_filter(table: Table, owner: Uuid, id: Uuid) -> Vec<(&'static str, String)> {
    let mut query = vec![("id", format!("eq.{id}"))];
    if let Some(column) = table.owner_column().filter(|c| *c != "id") {
        query.push((column, format!("eq.{owner}")));
    }
    query
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, table: Table, owner: Uuid) -> Result<Vec<Value>, StorageError> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        if let Some(column) = table.owner_column() {
            query.push((column.to_string(), format!("eq.{owner}")));
        }

        let req = self.http.get(self.endpoint(table)).query(&query);
        self.send_rows(table, req).await
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StorageError> {
        let req = self
            .http
            .post(self.endpoint(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let rows = self.send_rows(table, req).await?;
        single(table, rows)
    }

    async fn update(
        &self,
        table: Table,
        owner: Uuid,
        id: Uuid,
        row: Value,
    ) -> Result<Value, StorageError> {
        let req = self
            .http
            .patch(self.endpoint(table))
            .query(&row_filter(table, owner, id))
            .header("Prefer", "return=representation")
            .json(&row);
        let rows = self.send_rows(table, req).await?;
        rows.into_iter().next().ok_or_else(|| StorageError::NotFound {
            table: table.to_string(),
            id,
        })
    }

    async fn delete(&self, table: Table, owner: Uuid, id: Uuid) -> Result<(), StorageError> {
        let req = self
            .http
            .delete(self.endpoint(table))
            .query(&row_filter(table, owner, id))
            .header("Prefer", "return=representation");
        let rows = self.send_rows(table, req).await?;
        if rows.is_empty() {
            return Err(StorageError::NotFound {
                table: table.to_string(),
                id,
            });
        }
        Ok(())
    }
}
