//! Change notifications for backend tables.
//!
//! Subscribers register a callback per table and are invoked with a
//! [`Change`] describing what happened. The feed does not know how changes
//! arrive: a realtime socket, a poller, or [`DataAccess`](crate::DataAccess)
//! writes can all publish into the same feed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::backend::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Callback = Arc<dyn Fn(&Change) + Send + Sync>;

pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, table: Table, callback: Callback) -> SubscriptionId;

    /// Returns false if the subscription was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    fn publish(&self, change: Change);
}

struct Subscriber {
    id: SubscriptionId,
    table: Table,
    callback: Callback,
}

/// In-process feed. `publish` calls matching callbacks synchronously, in
/// subscription order.
#[derive(Default)]
pub struct LocalChangeFeed {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl LocalChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl ChangeFeed for LocalChangeFeed {
    fn subscribe(&self, table: Table, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Subscriber {
                id,
                table,
                callback,
            });
        tracing::debug!(table = %table, "change subscription added");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    fn publish(&self, change: Change) {
        // Callbacks run outside the lock so they may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| s.table == change.table)
            .map(|s| Arc::clone(&s.callback))
            .collect();

        for callback in callbacks {
            callback(&change);
        }
    }
}
