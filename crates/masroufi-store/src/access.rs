//! Typed data access over a [`Backend`].
//!
//! Every call is one round trip and returns `Result<_, StorageError>`;
//! callers choose whether to fall back or propagate. The one built-in
//! fallback is [`DataAccess::load_snapshot`], where each collection that
//! fails to load degrades to empty.

use std::sync::Arc;

use uuid::Uuid;

use masroufi_core::models::{Budget, Category, Deal, Goal, Notification, Transaction, User};
use masroufi_core::state::Snapshot;

use crate::backend::{Backend, Table};
use crate::changes::{Change, ChangeFeed, ChangeKind};
use crate::error::StorageError;
use crate::rows::Record;

pub struct DataAccess<B> {
    backend: B,
    feed: Option<Arc<dyn ChangeFeed>>,
}

impl<B: Backend> DataAccess<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            feed: None,
        }
    }

    /// Publish a [`Change`] on `feed` after every successful write.
    pub fn with_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn fetch_all<R: Record>(&self, owner: Uuid) -> Result<Vec<R>, StorageError> {
        let rows = self.backend.select(R::TABLE, owner).await?;
        rows.into_iter()
            .map(|value| Ok(R::from_row(serde_json::from_value(value)?)))
            .collect()
    }

    pub async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.fetch_all::<User>(id).await?.into_iter().next())
    }

    /// Insert `record` and return it as stored.
    pub async fn insert<R: Record>(&self, record: &R) -> Result<R, StorageError> {
        let row = serde_json::to_value(record.to_row())?;
        let stored = self.backend.insert(R::TABLE, row).await?;
        let record = R::from_row(serde_json::from_value(stored)?);
        self.notify(R::TABLE, ChangeKind::Insert, record.id());
        Ok(record)
    }

    /// Overwrite the row `owner` holds under `record`'s id and return it as
    /// stored.
    pub async fn update<R: Record>(&self, owner: Uuid, record: &R) -> Result<R, StorageError> {
        let row = serde_json::to_value(record.to_row())?;
        let stored = self.backend.update(R::TABLE, owner, record.id(), row).await?;
        let record = R::from_row(serde_json::from_value(stored)?);
        self.notify(R::TABLE, ChangeKind::Update, record.id());
        Ok(record)
    }

    pub async fn delete<R: Record>(&self, owner: Uuid, id: Uuid) -> Result<(), StorageError> {
        self.backend.delete(R::TABLE, owner, id).await?;
        self.notify(R::TABLE, ChangeKind::Delete, id);
        Ok(())
    }

    /// Load every collection owned by `owner`, plus the shared deals.
    pub async fn load_snapshot(&self, owner: Uuid) -> Snapshot {
        Snapshot {
            categories: self.fetch_or_empty::<Category>(owner).await,
            transactions: self.fetch_or_empty::<Transaction>(owner).await,
            budgets: self.fetch_or_empty::<Budget>(owner).await,
            goals: self.fetch_or_empty::<Goal>(owner).await,
            notifications: self.fetch_or_empty::<Notification>(owner).await,
            deals: self.fetch_or_empty::<Deal>(owner).await,
        }
    }

    async fn fetch_or_empty<R: Record>(&self, owner: Uuid) -> Vec<R> {
        match self.fetch_all::<R>(owner).await {
            Ok(records) => records,
            Err(e) => {
                let table = R::TABLE;
                tracing::warn!(table = %table, error = %e, "read failed, using empty collection");
                Vec::new()
            }
        }
    }

    fn notify(&self, table: Table, kind: ChangeKind, id: Uuid) {
        if let Some(feed) = &self.feed {
            feed.publish(Change { table, kind, id });
        }
    }
}
