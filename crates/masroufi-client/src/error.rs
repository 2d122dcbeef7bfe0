use thiserror::Error;
use uuid::Uuid;

use masroufi_assistant::error::AssistantError;
use masroufi_auth::error::AuthError;
use masroufi_core::error::CoreError;
use masroufi_store::error::StorageError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no user is signed in")]
    NotSignedIn,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),
}
