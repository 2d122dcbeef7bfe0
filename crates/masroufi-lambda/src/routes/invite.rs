use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub inviter_name: String,
    #[serde(default)]
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteResponse {
    pub success: bool,
    pub message: String,
}

/// Record a family invitation.
///
/// No mail is sent; the invitation is only logged.
pub async fn send_invite(
    body: Result<Json<InviteRequest>, JsonRejection>,
) -> Result<Json<InviteResponse>, ApiError> {
    let Json(invite) = body?;

    let email = invite.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest(format!("invalid email address: {email}")));
    }
    let inviter = invite.inviter_name.trim();
    if inviter.is_empty() {
        return Err(ApiError::BadRequest("inviterName is required".to_string()));
    }

    let family = invite.family_name.as_deref().unwrap_or("their family");
    tracing::info!(email = email, inviter = inviter, family = family, "family invitation");

    Ok(Json(InviteResponse {
        success: true,
        message: format!("Invitation sent to {email}"),
    }))
}
