use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("row not found in {table}: {id}")]
    NotFound { table: String, id: Uuid },

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("backend returned no row for write on {table}")]
    EmptyResponse { table: String },

    #[error("request to backend failed: {0}")]
    Request(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Request(e.to_string())
    }
}
