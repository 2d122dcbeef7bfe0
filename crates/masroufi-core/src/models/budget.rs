use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{self, CoreError};

/// A spending limit for one category over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    /// The limit.
    pub amount: f64,
    #[serde(default)]
    pub spent: f64,
    pub period: BudgetPeriod,
    pub start_date: jiff::civil::Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl Budget {
    pub fn new(
        user_id: Uuid,
        category_id: Uuid,
        amount: f64,
        period: BudgetPeriod,
        start_date: jiff::civil::Date,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            amount,
            spent: 0.0,
            period,
            start_date,
        }
    }

    /// `spent / amount` as a rounded percentage.
    pub fn usage_percent(&self) -> u32 {
        super::percent(self.spent, self.amount)
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent > self.amount
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        error::require_positive("amount", self.amount)
    }
}
