//! Outbound replication of local writes.
//!
//! `QueuedStorage` wraps a local store and records every successful write as a
//! `QueuedOperation`. `replay` later pushes the queue, oldest first, into a
//! remote `Storage`. Nothing in `core` knows this module exists.

use crate::core::errors::ExpenseError;
use crate::core::models::{Group, GroupMember, Settlement, Transaction, TransactionSplit, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod in_memory;
pub mod queued;

pub use in_memory::InMemorySyncQueue;
pub use queued::QueuedStorage;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Users,
    Groups,
    GroupMembers,
    Transactions,
    TransactionSplits,
    Settlements,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueuedOperation {
    pub id: String,
    pub operation: Operation,
    pub table: Table,
    pub record_id: String,
    /// Full row for inserts and updates, absent for deletes.
    pub data: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl QueuedOperation {
    pub fn new(operation: Operation, table: Table, record_id: &str, data: Option<serde_json::Value>) -> Self {
        QueuedOperation {
            id: Uuid::new_v4().to_string(),
            operation,
            table,
            record_id: record_id.to_string(),
            data,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub pending_operations: usize,
    pub last_sync: Option<DateTime<Utc>>,
}

/// FIFO of writes that have not reached the remote yet.
#[async_trait]
pub trait SyncQueue: Send + Sync {
    async fn enqueue(&self, operation: QueuedOperation) -> Result<(), ExpenseError>;
    /// Queued operations, oldest first.
    async fn pending(&self) -> Result<Vec<QueuedOperation>, ExpenseError>;
    async fn remove(&self, operation_id: &str) -> Result<(), ExpenseError>;
    async fn len(&self) -> Result<usize, ExpenseError>;
    async fn last_sync(&self) -> Result<Option<DateTime<Utc>>, ExpenseError>;
    async fn mark_synced(&self, at: DateTime<Utc>) -> Result<(), ExpenseError>;
}

pub async fn status<Q: SyncQueue>(queue: &Q) -> Result<SyncStatus, ExpenseError> {
    Ok(SyncStatus {
        pending_operations: queue.len().await?,
        last_sync: queue.last_sync().await?,
    })
}

/// Applies queued operations to `remote` in order and returns how many went through.
///
/// Each operation is dropped from the queue once applied. The first failure
/// stops the run and leaves it and everything after it queued. The sync time
/// is only recorded when the queue is fully drained.
pub async fn replay<Q: SyncQueue, R: Storage>(queue: &Q, remote: &R) -> Result<usize, ExpenseError> {
    let pending = queue.pending().await?;
    let total = pending.len();
    let mut applied = 0;

    for operation in pending {
        if let Err(e) = apply(&operation, remote).await {
            warn!(
                operation_id = %operation.id,
                table = ?operation.table,
                record_id = %operation.record_id,
                applied,
                total,
                error = %e,
                "replay stopped"
            );
            return Err(e);
        }
        queue.remove(&operation.id).await?;
        applied += 1;
        debug!(operation_id = %operation.id, table = ?operation.table, "replayed operation");
    }

    queue.mark_synced(Utc::now()).await?;
    info!(applied, "Sync queue drained");
    Ok(applied)
}

/// Copies every remote row into `local`, parents before children, then records the sync time.
///
/// Rows are upserted; local rows missing from the remote are left alone. When
/// the local side is a `QueuedStorage`, pass its `local()` store so pulled rows
/// are not queued back out. Returns the number of rows written.
pub async fn pull<R: Storage, L: Storage, Q: SyncQueue>(remote: &R, local: &L, queue: &Q) -> Result<usize, ExpenseError> {
    let mut pulled = 0;

    for user in remote.list_users().await? {
        local.save_user(user).await?;
        pulled += 1;
    }
    for group in remote.list_groups().await? {
        local.save_group(group).await?;
        pulled += 1;
    }
    for member in remote.list_group_members().await? {
        local.save_group_member(member).await?;
        pulled += 1;
    }
    for transaction in remote.list_transactions().await? {
        local.save_transaction(transaction).await?;
        pulled += 1;
    }
    for split in remote.list_splits().await? {
        local.save_split(split).await?;
        pulled += 1;
    }
    for settlement in remote.list_settlements().await? {
        local.save_settlement(settlement).await?;
        pulled += 1;
    }

    queue.mark_synced(Utc::now()).await?;
    info!(pulled, "Pulled remote rows");
    Ok(pulled)
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct SyncSummary {
    pub pushed: usize,
    pub pulled: usize,
}

/// Pushes the queue with [`replay`], then refreshes `local` with [`pull`].
/// Nothing is pulled if the push stops early.
pub async fn sync_all<Q: SyncQueue, R: Storage, L: Storage>(
    queue: &Q,
    remote: &R,
    local: &L,
) -> Result<SyncSummary, ExpenseError> {
    let pushed = replay(queue, remote).await?;
    let pulled = pull(remote, local, queue).await?;
    Ok(SyncSummary { pushed, pulled })
}

async fn apply<R: Storage>(operation: &QueuedOperation, remote: &R) -> Result<(), ExpenseError> {
    let id = operation.record_id.as_str();
    if operation.operation == Operation::Delete {
        return match operation.table {
            Table::Users => remote.delete_user(id).await,
            Table::Groups => remote.delete_group(id).await,
            Table::GroupMembers => remote.delete_group_member(id).await,
            Table::Transactions => remote.delete_transaction(id).await,
            Table::TransactionSplits => remote.delete_split(id).await,
            Table::Settlements => remote.delete_settlement(id).await,
        };
    }

    match operation.table {
        Table::Users => remote.save_user(row::<User>(operation)?).await,
        Table::Groups => remote.save_group(row::<Group>(operation)?).await,
        Table::GroupMembers => remote.save_group_member(row::<GroupMember>(operation)?).await,
        Table::Transactions => remote.save_transaction(row::<Transaction>(operation)?).await,
        Table::TransactionSplits => remote.save_split(row::<TransactionSplit>(operation)?).await,
        Table::Settlements => remote.save_settlement(row::<Settlement>(operation)?).await,
    }
}

fn row<T: DeserializeOwned>(operation: &QueuedOperation) -> Result<T, ExpenseError> {
    let data = operation.data.clone().ok_or_else(|| {
        ExpenseError::SyncError(format!("operation {} has no row data", operation.id))
    })?;
    serde_json::from_value(data)
        .map_err(|e| ExpenseError::SyncError(format!("operation {}: {}", operation.id, e)))
}
