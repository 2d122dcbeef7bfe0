//! Client application state.
//!
//! `AppState` is a plain value. The only way to change it is [`reduce`],
//! which takes the current snapshot and an [`Action`] and returns the next
//! snapshot. Callers own the value and pass it where it is needed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Budget, Category, Deal, Goal, Notification, Transaction, User};

/// Every collection loaded for a signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub notifications: Vec<Notification>,
    pub deals: Vec<Deal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: Option<User>,
    pub authenticated: bool,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub notifications: Vec<Notification>,
    pub deals: Vec<Deal>,
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Replace everything after an auth transition into a signed-in session.
    Hydrated { user: User, snapshot: Snapshot },
    SignedOut,
    UserSaved(User),
    CategorySaved(Category),
    TransactionSaved(Transaction),
    TransactionRemoved(Uuid),
    BudgetSaved(Budget),
    GoalSaved(Goal),
    NotificationSaved(Notification),
    NotificationRead(Uuid),
}

/// Compute the next state. Never mutates `state`.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::Hydrated { user, snapshot } => {
            next = AppState {
                user: Some(user),
                authenticated: true,
                categories: snapshot.categories,
                transactions: snapshot.transactions,
                budgets: snapshot.budgets,
                goals: snapshot.goals,
                notifications: snapshot.notifications,
                deals: snapshot.deals,
            };
        }
        Action::SignedOut => next = AppState::default(),
        Action::UserSaved(user) => next.user = Some(user),
        Action::CategorySaved(c) => upsert(&mut next.categories, c, |x| x.id),
        Action::TransactionSaved(t) => upsert(&mut next.transactions, t, |x| x.id),
        Action::TransactionRemoved(id) => next.transactions.retain(|t| t.id != id),
        Action::BudgetSaved(b) => upsert(&mut next.budgets, b, |x| x.id),
        Action::GoalSaved(g) => upsert(&mut next.goals, g, |x| x.id),
        Action::NotificationSaved(n) => upsert(&mut next.notifications, n, |x| x.id),
        Action::NotificationRead(id) => {
            if let Some(n) = next.notifications.iter_mut().find(|n| n.id == id) {
                n.read = true;
            }
        }
    }

    next
}

/// Replace the item with the same id, or append it.
fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> Uuid) {
    let key = id(&item);
    match items.iter_mut().find(|existing| id(existing) == key) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

impl AppState {
    pub fn currency(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.currency.as_str())
            .unwrap_or(User::DEFAULT_CURRENCY)
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}
