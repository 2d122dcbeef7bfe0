use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StorageError;

/// Tables exposed by the hosted backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Categories,
    Transactions,
    Budgets,
    Goals,
    Notifications,
    Deals,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Users,
        Table::Categories,
        Table::Transactions,
        Table::Budgets,
        Table::Goals,
        Table::Notifications,
        Table::Deals,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Categories => "categories",
            Table::Transactions => "transactions",
            Table::Budgets => "budgets",
            Table::Goals => "goals",
            Table::Notifications => "notifications",
            Table::Deals => "deals",
        }
    }

    /// Column holding the owning user's id. `None` for shared tables.
    pub fn owner_column(self) -> Option<&'static str> {
        match self {
            Table::Users => Some("id"),
            Table::Deals => None,
            _ => Some("user_id"),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The hosted data service, seen as raw snake_case JSON rows.
///
/// Every method is exactly one round trip. Writes return the row as stored.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All rows of `table` owned by `owner`. Shared tables ignore `owner`.
    async fn select(&self, table: Table, owner: Uuid) -> Result<Vec<Value>, StorageError>;

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StorageError>;

    /// Rows of `table` not owned by `owner` are invisible: writing one is
    /// [`StorageError::NotFound`].
    async fn update(
        &self,
        table: Table,
        owner: Uuid,
        id: Uuid,
        row: Value,
    ) -> Result<Value, StorageError>;

    async fn delete(&self, table: Table, owner: Uuid, id: Uuid) -> Result<(), StorageError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn select(&self, table: Table, owner: Uuid) -> Result<Vec<Value>, StorageError> {
        (**self).select(table, owner).await
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StorageError> {
        (**self).insert(table, row).await
    }

    async fn update(
        &self,
        table: Table,
        owner: Uuid,
        id: Uuid,
        row: Value,
    ) -> Result<Value, StorageError> {
        (**self).update(table, owner, id, row).await
    }

    async fn delete(&self, table: Table, owner: Uuid, id: Uuid) -> Result<(), StorageError> {
        (**self).delete(table, owner, id).await
    }
}
