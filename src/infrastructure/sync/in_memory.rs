use super::{QueuedOperation, SyncQueue};
use crate::core::errors::ExpenseError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemorySyncQueue {
    operations: Arc<RwLock<Vec<QueuedOperation>>>,
    last_sync: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl InMemorySyncQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SyncQueue for InMemorySyncQueue {
    async fn enqueue(&self, operation: QueuedOperation) -> Result<(), ExpenseError> {
        self.operations.write().await.push(operation);
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<QueuedOperation>, ExpenseError> {
        Ok(self.operations.read().await.clone())
    }

    async fn remove(&self, operation_id: &str) -> Result<(), ExpenseError> {
        self.operations.write().await.retain(|op| op.id != operation_id);
        Ok(())
    }

    async fn len(&self) -> Result<usize, ExpenseError> {
        Ok(self.operations.read().await.len())
    }

    async fn last_sync(&self) -> Result<Option<DateTime<Utc>>, ExpenseError> {
        Ok(*self.last_sync.read().await)
    }

    async fn mark_synced(&self, at: DateTime<Utc>) -> Result<(), ExpenseError> {
        *self.last_sync.write().await = Some(at);
        Ok(())
    }
}
