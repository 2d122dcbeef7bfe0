use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("chat provider credential is not configured")]
    MissingCredential,

    /// Failure reported by (or on the way to) the chat provider. The message
    /// is the provider's own when it sent one.
    #[error("{0}")]
    Upstream(String),

    #[error("assistant request failed: {0}")]
    Request(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssistantError {
    /// True for errors raised before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, AssistantError::MissingField(_))
    }
}
