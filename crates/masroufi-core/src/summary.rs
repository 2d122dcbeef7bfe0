//! Financial context summarizer for the assistant.
//!
//! Flattens the user's in-memory collections into a short text block that is
//! sent alongside every assistant prompt. The summary is recomputed from
//! scratch on each call and discarded afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Budget, Category, Transaction, TransactionType};

/// Number of expense categories listed in the summary.
pub const TOP_CATEGORIES: usize = 3;

/// Label used when a transaction or budget points at an unknown category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub currency: String,
    pub total_income: f64,
    pub total_expense: f64,
    /// `(category name, amount)`, largest first.
    pub top_expense_categories: Vec<(String, f64)>,
    pub budgets: Vec<BudgetUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub category: String,
    pub spent: f64,
    pub limit: f64,
    pub percentage: u32,
}

/// Summarize the given collections.
pub fn summarize(
    currency: &str,
    transactions: &[Transaction],
    categories: &[Category],
    budgets: &[Budget],
) -> FinancialSummary {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let name_of = |id: &Uuid| names.get(id).copied().unwrap_or(UNCATEGORIZED);

    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut by_category: HashMap<&str, f64> = HashMap::new();

    for txn in transactions {
        match txn.kind {
            TransactionType::Income => total_income += txn.amount,
            TransactionType::Expense => {
                total_expense += txn.amount;
                *by_category.entry(name_of(&txn.category_id)).or_insert(0.0) += txn.amount;
            }
        }
    }

    let mut top_expense_categories: Vec<(String, f64)> = by_category
        .into_iter()
        .map(|(name, amount)| (name.to_string(), amount))
        .collect();
    top_expense_categories.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_expense_categories.truncate(TOP_CATEGORIES);

    let budgets = budgets
        .iter()
        .map(|b| BudgetUsage {
            category: name_of(&b.category_id).to_string(),
            spent: b.spent,
            limit: b.amount,
            percentage: b.usage_percent(),
        })
        .collect();

    FinancialSummary {
        currency: currency.to_string(),
        total_income,
        total_expense,
        top_expense_categories,
        budgets,
    }
}

impl FinancialSummary {
    /// Render the summary as the plain-text context block sent to the
    /// assistant.
    pub fn to_context_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Currency: {}\n", self.currency));
        out.push_str(&format!("Total monthly income: {:.2}\n", self.total_income));
        out.push_str(&format!("Total monthly expenses: {:.2}\n", self.total_expense));

        if !self.top_expense_categories.is_empty() {
            out.push_str("Top expense categories:\n");
            for (name, amount) in &self.top_expense_categories {
                out.push_str(&format!("- {name}: {amount:.2}\n"));
            }
        }

        if !self.budgets.is_empty() {
            out.push_str("Budgets:\n");
            for b in &self.budgets {
                out.push_str(&format!(
                    "- {}: spent {:.2} of {:.2} ({}%)\n",
                    b.category, b.spent, b.limit, b.percentage
                ));
            }
        }

        out
    }
}
