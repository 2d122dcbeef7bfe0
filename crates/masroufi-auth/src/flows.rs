use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::client::AuthClient;
use crate::error::AuthError;

/// Tokens for a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user_id: Uuid,
    pub email: String,
}

/// Result of a sign-up attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpResult {
    /// Account created and signed in.
    Success(AuthSession),
    /// Account created; the user must confirm their email before signing in.
    ConfirmationRequired { user_id: Uuid, email: String },
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Body of a token grant. Sign-up returns the same shape when no email
/// confirmation is required, or a bare user object otherwise.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    user: Option<AuthUser>,
    // Bare user object fields.
    id: Option<Uuid>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> Result<AuthSession, AuthError> {
        let user = self
            .user
            .ok_or_else(|| AuthError::AuthFailed("token response has no user".to_string()))?;
        Ok(AuthSession {
            access_token: self
                .access_token
                .ok_or_else(|| AuthError::AuthFailed("token response has no access token".to_string()))?,
            refresh_token: self.refresh_token.unwrap_or_default(),
            expires_in: self.expires_in,
            user_id: user.id,
            email: user.email.unwrap_or_default(),
        })
    }
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(field.to_string()));
    }
    Ok(())
}

async fn check_status(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error_description.or(b.msg).or(b.message))
        .unwrap_or_else(|| format!("auth service returned {status}"));
    Err(AuthError::AuthFailed(message))
}

/// Register a new account. `name` is stored in the user metadata.
pub async fn sign_up(
    client: &AuthClient,
    email: &str,
    password: &str,
    name: &str,
) -> Result<SignUpResult, AuthError> {
    require("email", email)?;
    require("password", password)?;
    info!(email = email, "signing up");

    let response = client
        .http
        .post(client.endpoint("signup"))
        .json(&json!({ "email": email, "password": password, "data": { "name": name } }))
        .send()
        .await?;
    let body: TokenResponse = check_status(response).await?.json().await?;

    if body.access_token.is_some() {
        return Ok(SignUpResult::Success(body.into_session()?));
    }

    let (user_id, email) = match (body.user, body.id) {
        (Some(user), _) => (user.id, user.email.unwrap_or_default()),
        (None, Some(id)) => (id, body.email.unwrap_or_default()),
        (None, None) => {
            return Err(AuthError::AuthFailed(
                "sign-up response has no user".to_string(),
            ));
        }
    };
    Ok(SignUpResult::ConfirmationRequired { user_id, email })
}

/// Email/password sign-in.
pub async fn sign_in(
    client: &AuthClient,
    email: &str,
    password: &str,
) -> Result<AuthSession, AuthError> {
    require("email", email)?;
    require("password", password)?;
    info!(email = email, "signing in");

    let response = client
        .http
        .post(client.endpoint("token"))
        .query(&[("grant_type", "password")])
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    let body: TokenResponse = check_status(response).await?.json().await?;
    body.into_session()
}

/// Exchange a refresh token for a new session.
pub async fn refresh(client: &AuthClient, refresh_token: &str) -> Result<AuthSession, AuthError> {
    require("refresh_token", refresh_token)?;

    let response = client
        .http
        .post(client.endpoint("token"))
        .query(&[("grant_type", "refresh_token")])
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await?;
    let body: TokenResponse = check_status(response).await?.json().await?;
    body.into_session()
}

/// Revoke the session behind `access_token`.
pub async fn sign_out(client: &AuthClient, access_token: &str) -> Result<(), AuthError> {
    let response = client
        .http
        .post(client.endpoint("logout"))
        .bearer_auth(access_token)
        .send()
        .await?;
    check_status(response).await?;
    info!("signed out");
    Ok(())
}
