use crate::core::errors::ExpenseError;
use crate::core::models::{Group, GroupMember, Settlement, Transaction, TransactionSplit, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use tracing::trace;

/// Stand-in for when no persistence backend exists in the current context.
///
/// Reads come back empty and writes are accepted and dropped, so callers keep
/// working without ever seeing an error from the store.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStorage;

impl UnavailableStorage {
    pub fn new() -> Self {
        UnavailableStorage
    }
}

#[async_trait]
impl Storage for UnavailableStorage {
    async fn list_users(&self) -> Result<Vec<User>, ExpenseError> {
        Ok(Vec::new())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ExpenseError> {
        Ok(Vec::new())
    }

    async fn list_group_members(&self) -> Result<Vec<GroupMember>, ExpenseError> {
        Ok(Vec::new())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(Vec::new())
    }

    async fn list_splits(&self) -> Result<Vec<TransactionSplit>, ExpenseError> {
        Ok(Vec::new())
    }

    async fn list_settlements(&self) -> Result<Vec<Settlement>, ExpenseError> {
        Ok(Vec::new())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ExpenseError> {
        trace!(user_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ExpenseError> {
        trace!(group_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_group_member(&self, member_id: &str) -> Result<Option<GroupMember>, ExpenseError> {
        trace!(member_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_members_by_group(&self, group_id: &str) -> Result<Vec<GroupMember>, ExpenseError> {
        trace!(group_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_members_by_user(&self, user_id: &str) -> Result<Vec<GroupMember>, ExpenseError> {
        trace!(user_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, ExpenseError> {
        trace!(transaction_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_transactions_by_group(&self, group_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        trace!(group_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_transactions_by_payer(&self, user_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        trace!(user_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_split(&self, split_id: &str) -> Result<Option<TransactionSplit>, ExpenseError> {
        trace!(split_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_splits_by_transaction(&self, transaction_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        trace!(transaction_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_splits_by_user(&self, user_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        trace!(user_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<Settlement>, ExpenseError> {
        trace!(settlement_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_settlements_by_from_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        trace!(user_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_settlements_by_to_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        trace!(user_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn get_settlements_by_group(&self, group_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        trace!(group_id, "storage unavailable");
        Ok(Default::default())
    }

    async fn save_user(&self, user: User) -> Result<(), ExpenseError> {
        trace!(id = %user.id, "storage unavailable, write dropped");
        Ok(())
    }

    async fn save_group(&self, group: Group) -> Result<(), ExpenseError> {
        trace!(id = %group.id, "storage unavailable, write dropped");
        Ok(())
    }

    async fn save_group_member(&self, member: GroupMember) -> Result<(), ExpenseError> {
        trace!(id = %member.id, "storage unavailable, write dropped");
        Ok(())
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), ExpenseError> {
        trace!(id = %transaction.id, "storage unavailable, write dropped");
        Ok(())
    }

    async fn save_split(&self, split: TransactionSplit) -> Result<(), ExpenseError> {
        trace!(id = %split.id, "storage unavailable, write dropped");
        Ok(())
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), ExpenseError> {
        trace!(id = %settlement.id, "storage unavailable, write dropped");
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), ExpenseError> {
        trace!(user_id, "storage unavailable, delete dropped");
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), ExpenseError> {
        trace!(group_id, "storage unavailable, delete dropped");
        Ok(())
    }

    async fn delete_group_member(&self, member_id: &str) -> Result<(), ExpenseError> {
        trace!(member_id, "storage unavailable, delete dropped");
        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), ExpenseError> {
        trace!(transaction_id, "storage unavailable, delete dropped");
        Ok(())
    }

    async fn delete_split(&self, split_id: &str) -> Result<(), ExpenseError> {
        trace!(split_id, "storage unavailable, delete dropped");
        Ok(())
    }

    async fn delete_settlement(&self, settlement_id: &str) -> Result<(), ExpenseError> {
        trace!(settlement_id, "storage unavailable, delete dropped");
        Ok(())
    }
}
