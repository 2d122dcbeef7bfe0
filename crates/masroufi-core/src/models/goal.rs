use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{self, CoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<jiff::civil::Date>,
    pub created_at: jiff::Timestamp,
}

impl Goal {
    pub fn new(user_id: Uuid, name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Completion as a rounded percentage, capped at 100.
    pub fn progress(&self) -> u32 {
        super::percent(self.current_amount, self.target_amount).min(100)
    }

    pub fn is_reached(&self) -> bool {
        self.target_amount > 0.0 && self.current_amount >= self.target_amount
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        error::require_non_empty("name", &self.name)?;
        error::require_positive("targetAmount", self.target_amount)
    }
}
