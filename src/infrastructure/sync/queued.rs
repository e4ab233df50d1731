use super::{Operation, QueuedOperation, SyncQueue, Table};
use crate::core::errors::ExpenseError;
use crate::core::models::{Group, GroupMember, Settlement, Transaction, TransactionSplit, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use tracing::trace;

/// `Storage` that writes through to `local` and queues each successful write for replay.
///
/// Reads never touch the queue. A write that fails locally is not queued.
#[derive(Clone)]
pub struct QueuedStorage<S: Storage, Q: SyncQueue> {
    local: S,
    queue: Q,
}

impl<S: Storage, Q: SyncQueue> QueuedStorage<S, Q> {
    pub fn new(local: S, queue: Q) -> Self {
        QueuedStorage { local, queue }
    }

    pub fn local(&self) -> &S {
        &self.local
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    async fn record_write(
        &self,
        table: Table,
        record_id: &str,
        existed: bool,
        data: serde_json::Value,
    ) -> Result<(), ExpenseError> {
        let operation = if existed { Operation::Update } else { Operation::Insert };
        trace!(?table, record_id, ?operation, "queueing write");
        self.queue
            .enqueue(QueuedOperation::new(operation, table, record_id, Some(data)))
            .await
    }

    async fn record_delete(&self, table: Table, record_id: &str) -> Result<(), ExpenseError> {
        trace!(?table, record_id, "queueing delete");
        self.queue
            .enqueue(QueuedOperation::new(Operation::Delete, table, record_id, None))
            .await
    }
}

#[async_trait]
impl<S: Storage, Q: SyncQueue> Storage for QueuedStorage<S, Q> {
    async fn list_users(&self) -> Result<Vec<User>, ExpenseError> {
        self.local.list_users().await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ExpenseError> {
        self.local.get_user(user_id).await
    }

    async fn save_user(&self, user: User) -> Result<(), ExpenseError> {
        let existed = self.local.get_user(&user.id).await?.is_some();
        let record_id = user.id.clone();
        let data = serde_json::to_value(&user).map_err(|e| ExpenseError::SyncError(e.to_string()))?;
        self.local.save_user(user).await?;
        self.record_write(Table::Users, &record_id, existed, data).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), ExpenseError> {
        self.local.delete_user(user_id).await?;
        self.record_delete(Table::Users, user_id).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ExpenseError> {
        self.local.list_groups().await
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ExpenseError> {
        self.local.get_group(group_id).await
    }

    async fn save_group(&self, group: Group) -> Result<(), ExpenseError> {
        let existed = self.local.get_group(&group.id).await?.is_some();
        let record_id = group.id.clone();
        let data = serde_json::to_value(&group).map_err(|e| ExpenseError::SyncError(e.to_string()))?;
        self.local.save_group(group).await?;
        self.record_write(Table::Groups, &record_id, existed, data).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), ExpenseError> {
        self.local.delete_group(group_id).await?;
        self.record_delete(Table::Groups, group_id).await
    }

    async fn list_group_members(&self) -> Result<Vec<GroupMember>, ExpenseError> {
        self.local.list_group_members().await
    }

    async fn get_group_member(&self, member_id: &str) -> Result<Option<GroupMember>, ExpenseError> {
        self.local.get_group_member(member_id).await
    }

    async fn save_group_member(&self, member: GroupMember) -> Result<(), ExpenseError> {
        let existed = self.local.get_group_member(&member.id).await?.is_some();
        let record_id = member.id.clone();
        let data = serde_json::to_value(&member).map_err(|e| ExpenseError::SyncError(e.to_string()))?;
        self.local.save_group_member(member).await?;
        self.record_write(Table::GroupMembers, &record_id, existed, data).await
    }

    async fn delete_group_member(&self, member_id: &str) -> Result<(), ExpenseError> {
        self.local.delete_group_member(member_id).await?;
        self.record_delete(Table::GroupMembers, member_id).await
    }

    async fn get_members_by_group(&self, group_id: &str) -> Result<Vec<GroupMember>, ExpenseError> {
        self.local.get_members_by_group(group_id).await
    }

    async fn get_members_by_user(&self, user_id: &str) -> Result<Vec<GroupMember>, ExpenseError> {
        self.local.get_members_by_user(user_id).await
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ExpenseError> {
        self.local.list_transactions().await
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, ExpenseError> {
        self.local.get_transaction(transaction_id).await
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), ExpenseError> {
        let existed = self.local.get_transaction(&transaction.id).await?.is_some();
        let record_id = transaction.id.clone();
        let data = serde_json::to_value(&transaction).map_err(|e| ExpenseError::SyncError(e.to_string()))?;
        self.local.save_transaction(transaction).await?;
        self.record_write(Table::Transactions, &record_id, existed, data).await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), ExpenseError> {
        self.local.delete_transaction(transaction_id).await?;
        self.record_delete(Table::Transactions, transaction_id).await
    }

    async fn get_transactions_by_group(&self, group_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        self.local.get_transactions_by_group(group_id).await
    }

    async fn get_transactions_by_payer(&self, user_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        self.local.get_transactions_by_payer(user_id).await
    }

    async fn list_splits(&self) -> Result<Vec<TransactionSplit>, ExpenseError> {
        self.local.list_splits().await
    }

    async fn get_split(&self, split_id: &str) -> Result<Option<TransactionSplit>, ExpenseError> {
        self.local.get_split(split_id).await
    }

    async fn save_split(&self, split: TransactionSplit) -> Result<(), ExpenseError> {
        let existed = self.local.get_split(&split.id).await?.is_some();
        let record_id = split.id.clone();
        let data = serde_json::to_value(&split).map_err(|e| ExpenseError::SyncError(e.to_string()))?;
        self.local.save_split(split).await?;
        self.record_write(Table::TransactionSplits, &record_id, existed, data).await
    }

    async fn delete_split(&self, split_id: &str) -> Result<(), ExpenseError> {
        self.local.delete_split(split_id).await?;
        self.record_delete(Table::TransactionSplits, split_id).await
    }

    async fn get_splits_by_transaction(&self, transaction_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        self.local.get_splits_by_transaction(transaction_id).await
    }

    async fn get_splits_by_user(&self, user_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        self.local.get_splits_by_user(user_id).await
    }

    async fn list_settlements(&self) -> Result<Vec<Settlement>, ExpenseError> {
        self.local.list_settlements().await
    }

    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<Settlement>, ExpenseError> {
        self.local.get_settlement(settlement_id).await
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), ExpenseError> {
        let existed = self.local.get_settlement(&settlement.id).await?.is_some();
        let record_id = settlement.id.clone();
        let data = serde_json::to_value(&settlement).map_err(|e| ExpenseError::SyncError(e.to_string()))?;
        self.local.save_settlement(settlement).await?;
        self.record_write(Table::Settlements, &record_id, existed, data).await
    }

    async fn delete_settlement(&self, settlement_id: &str) -> Result<(), ExpenseError> {
        self.local.delete_settlement(settlement_id).await?;
        self.record_delete(Table::Settlements, settlement_id).await
    }

    async fn get_settlements_by_from_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        self.local.get_settlements_by_from_user(user_id).await
    }

    async fn get_settlements_by_to_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        self.local.get_settlements_by_to_user(user_id).await
    }

    async fn get_settlements_by_group(&self, group_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        self.local.get_settlements_by_group(group_id).await
    }
}
