//! Stored row shapes and their mapping to domain entities.
//!
//! The backend keeps snake_case columns; the application works with the
//! camelCase entities from `masroufi-core`. Each entity gets one row struct
//! and an explicit field-by-field mapping in both directions, so a schema
//! change shows up here as a compile error rather than a silently missing
//! field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use masroufi_core::models::{
    Budget, BudgetPeriod, Category, Deal, Goal, Notification, NotificationKind, Transaction,
    TransactionType, User,
};

use crate::backend::Table;

/// An entity that is persisted as one row of one backend table.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    type Row: Serialize + DeserializeOwned + Send;

    const TABLE: Table;

    fn id(&self) -> Uuid;

    fn to_row(&self) -> Self::Row;

    fn from_row(row: Self::Row) -> Self;
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub currency: String,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl Record for User {
    type Row = UserRow;
    const TABLE: Table = Table::Users;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> UserRow {
        UserRow {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            currency: self.currency.clone(),
            monthly_income: self.monthly_income,
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
        }
    }

    fn from_row(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            currency: row.currency,
            monthly_income: row.monthly_income,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
        }
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Record for Category {
    type Row = CategoryRow;
    const TABLE: Table = Table::Categories;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> CategoryRow {
        CategoryRow {
            id: self.id,
            user_id: self.user_id,
            name: self.name.clone(),
            kind: self.kind,
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }

    fn from_row(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            kind: row.kind,
            icon: row.icon,
            color: row.color,
        }
    }
}

// ── Transactions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    pub date: jiff::civil::Date,
    pub created_at: jiff::Timestamp,
}

impl Record for Transaction {
    type Row = TransactionRow;
    const TABLE: Table = Table::Transactions;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> TransactionRow {
        TransactionRow {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            kind: self.kind,
            category_id: self.category_id,
            description: self.description.clone(),
            date: self.date,
            created_at: self.created_at,
        }
    }

    fn from_row(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            kind: row.kind,
            category_id: row.category_id,
            description: row.description,
            date: row.date,
            created_at: row.created_at,
        }
    }
}

// ── Budgets ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub spent: f64,
    pub period: BudgetPeriod,
    pub start_date: jiff::civil::Date,
}

impl Record for Budget {
    type Row = BudgetRow;
    const TABLE: Table = Table::Budgets;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> BudgetRow {
        BudgetRow {
            id: self.id,
            user_id: self.user_id,
            category_id: self.category_id,
            amount: self.amount,
            spent: self.spent,
            period: self.period,
            start_date: self.start_date,
        }
    }

    fn from_row(row: BudgetRow) -> Self {
        Budget {
            id: row.id,
            user_id: row.user_id,
            category_id: row.category_id,
            amount: row.amount,
            spent: row.spent,
            period: row.period,
            start_date: row.start_date,
        }
    }
}

// ── Goals ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<jiff::civil::Date>,
    pub created_at: jiff::Timestamp,
}

impl Record for Goal {
    type Row = GoalRow;
    const TABLE: Table = Table::Goals;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> GoalRow {
        GoalRow {
            id: self.id,
            user_id: self.user_id,
            name: self.name.clone(),
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
            created_at: self.created_at,
        }
    }

    fn from_row(row: GoalRow) -> Self {
        Goal {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            target_amount: row.target_amount,
            current_amount: row.current_amount,
            deadline: row.deadline,
            created_at: row.created_at,
        }
    }
}

// ── Notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    pub created_at: jiff::Timestamp,
}

impl Record for Notification {
    type Row = NotificationRow;
    const TABLE: Table = Table::Notifications;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> NotificationRow {
        NotificationRow {
            id: self.id,
            user_id: self.user_id,
            title: self.title.clone(),
            message: self.message.clone(),
            kind: self.kind,
            read: self.read,
            created_at: self.created_at,
        }
    }

    fn from_row(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            kind: row.kind,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

// ── Deals ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRow {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub store: String,
    pub discount: f64,
    pub category: String,
    #[serde(default)]
    pub expires_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Record for Deal {
    type Row = DealRow;
    const TABLE: Table = Table::Deals;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> DealRow {
        DealRow {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            store: self.store.clone(),
            discount: self.discount,
            category: self.category.clone(),
            expires_at: self.expires_at,
            image_url: self.image_url.clone(),
        }
    }

    fn from_row(row: DealRow) -> Self {
        Deal {
            id: row.id,
            title: row.title,
            description: row.description,
            store: row.store,
            discount: row.discount,
            category: row.category,
            expires_at: row.expires_at,
            image_url: row.image_url,
        }
    }
}
