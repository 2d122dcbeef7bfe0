use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{self, CoreError};

/// A single income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Always positive; the direction is carried by `kind`.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: jiff::civil::Date,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionType {
    Income,
    Expense,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        kind: TransactionType,
        amount: f64,
        category_id: Uuid,
        date: jiff::civil::Date,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            kind,
            category_id,
            description: None,
            date,
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        error::require_positive("amount", self.amount)
    }
}
