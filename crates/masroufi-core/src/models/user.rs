use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A registered Masroufi user profile.
///
/// The id matches the identity issued by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// ISO 4217 code, e.g. `MAD`.
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl User {
    pub const DEFAULT_CURRENCY: &'static str = "MAD";

    pub fn new(id: Uuid, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
            currency: Self::DEFAULT_CURRENCY.to_string(),
            monthly_income: None,
            avatar_url: None,
            created_at: jiff::Timestamp::now(),
        }
    }
}
