use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: f64 },
}

/// Amounts must be finite and strictly positive.
pub(crate) fn require_positive(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidAmount {
            field: field.to_string(),
            value,
        })
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::MissingField(field.to_string()))
    } else {
        Ok(())
    }
}
