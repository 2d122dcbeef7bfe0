use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::{Backend, Table};
use crate::error::StorageError;

/// In-process backend holding rows as JSON, for tests and local runs.
///
/// Owner filtering mirrors the hosted service's row-level policies: selects,
/// updates and deletes only see rows whose owner column matches, and an
/// update may not hand a row to another owner.
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    failing: Mutex<HashSet<Table>>,
    requests: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent request against `table` fail.
    pub async fn fail_table(&self, table: Table) {
        self.failing.lock().await.insert(table);
    }

    /// Number of round trips served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub async fn rows(&self, table: Table) -> Vec<Value> {
        self.tables
            .lock()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    async fn begin(&self, table: Table) -> Result<(), StorageError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().await.contains(&table) {
            return Err(StorageError::Backend {
                status: 503,
                message: format!("{table} is unavailable"),
            });
        }
        Ok(())
    }
}

fn row_id(row: &Value) -> Option<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

fn owned_by(row: &Value, column: &str, owner: Uuid) -> bool {
    row.get(column)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        == Some(owner)
}

/// Rows of shared tables are visible to everyone.
fn visible_to(row: &Value, table: Table, owner: Uuid) -> bool {
    table
        .owner_column()
        .is_none_or(|column| owned_by(row, column, owner))
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: Table, owner: Uuid) -> Result<Vec<Value>, StorageError> {
        self.begin(table).await?;
        let tables = self.tables.lock().await;
        let rows = tables.get(&table).map(Vec::as_slice).unwrap_or_default();

        Ok(match table.owner_column() {
            Some(column) => rows
                .iter()
                .filter(|r| owned_by(r, column, owner))
                .cloned()
                .collect(),
            None => rows.to_vec(),
        })
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StorageError> {
        self.begin(table).await?;
        let id = row_id(&row).ok_or_else(|| StorageError::Backend {
            status: 400,
            message: "row has no valid id".to_string(),
        })?;

        let mut tables = self.tables.lock().await;
        let rows = tables.entry(table).or_default();
        if rows.iter().any(|r| row_id(r) == Some(id)) {
            return Err(StorageError::Backend {
                status: 409,
                message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
            });
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        owner: Uuid,
        id: Uuid,
        row: Value,
    ) -> Result<Value, StorageError> {
        self.begin(table).await?;
        if let Some(column) = table.owner_column()
            && row.get(column).is_some()
            && !owned_by(&row, column, owner)
        {
            return Err(StorageError::Backend {
                status: 403,
                message: format!("new row violates row-level security policy for table \"{table}\""),
            });
        }

        let mut tables = self.tables.lock().await;
        let slot = tables
            .get_mut(&table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|r| row_id(r) == Some(id) && visible_to(r, table, owner))
            })
            .ok_or_else(|| StorageError::NotFound {
                table: table.to_string(),
                id,
            })?;

        // PATCH semantics: merge the given columns into the stored row.
        if let (Value::Object(stored), Value::Object(patch)) = (&mut *slot, row) {
            for (column, value) in patch {
                stored.insert(column, value);
            }
        }
        Ok(slot.clone())
    }

    async fn delete(&self, table: Table, owner: Uuid, id: Uuid) -> Result<(), StorageError> {
        self.begin(table).await?;
        let mut tables = self.tables.lock().await;
        let rows = tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|r| !(row_id(r) == Some(id) && visible_to(r, table, owner)));
        if rows.len() == before {
            return Err(StorageError::NotFound {
                table: table.to_string(),
                id,
            });
        }
        Ok(())
    }
}
