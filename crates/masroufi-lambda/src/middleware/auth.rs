use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use masroufi_auth::jwt::validate_token;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT validation middleware.
///
/// When the state carries a JWT secret, requires `Authorization: Bearer
/// <token>` carrying a valid session token for a user. Without a secret the
/// request passes through.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(secret) = state.jwt_secret.as_deref() else {
        return Ok(next.run(req).await);
    };

    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = validate_token(token, secret)?;
    let user_id = claims.user_id()?;
    tracing::debug!(user_id = %user_id, path = %req.uri().path(), "authenticated request");

    Ok(next.run(req).await)
}
