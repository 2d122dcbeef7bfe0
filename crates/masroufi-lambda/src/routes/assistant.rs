use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use masroufi_assistant::proxy::{relay, ChatRequest, ChatResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// Relay one prompt to the chat provider.
///
/// The generated text comes back as `{"response": ...}`; failures come back
/// as `{"error": ...}` with a 4xx/5xx status.
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = body?;

    let response = relay(state.provider.as_ref(), &request).await?;
    Ok(Json(ChatResponse::Success { response }))
}
