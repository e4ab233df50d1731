use crate::core::errors::ExpenseError;
use crate::core::models::{Group, GroupMember, Settlement, Transaction, TransactionSplit, User};
use async_trait::async_trait;

/// Repository contract the ledger works through.
///
/// Every write is a single-row upsert or delete; nothing here is atomic across
/// rows. Listing methods return rows in insertion order.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, ExpenseError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ExpenseError>;
    async fn save_user(&self, user: User) -> Result<(), ExpenseError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), ExpenseError>;

    async fn list_groups(&self) -> Result<Vec<Group>, ExpenseError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ExpenseError>;
    async fn save_group(&self, group: Group) -> Result<(), ExpenseError>;
    async fn delete_group(&self, group_id: &str) -> Result<(), ExpenseError>;

    async fn list_group_members(&self) -> Result<Vec<GroupMember>, ExpenseError>;
    async fn get_group_member(&self, member_id: &str) -> Result<Option<GroupMember>, ExpenseError>;
    async fn save_group_member(&self, member: GroupMember) -> Result<(), ExpenseError>;
    async fn delete_group_member(&self, member_id: &str) -> Result<(), ExpenseError>;
    async fn get_members_by_group(&self, group_id: &str) -> Result<Vec<GroupMember>, ExpenseError>;
    async fn get_members_by_user(&self, user_id: &str) -> Result<Vec<GroupMember>, ExpenseError>;

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ExpenseError>;
    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, ExpenseError>;
    async fn save_transaction(&self, transaction: Transaction) -> Result<(), ExpenseError>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), ExpenseError>;
    async fn get_transactions_by_group(&self, group_id: &str) -> Result<Vec<Transaction>, ExpenseError>;
    async fn get_transactions_by_payer(&self, user_id: &str) -> Result<Vec<Transaction>, ExpenseError>;

    async fn list_splits(&self) -> Result<Vec<TransactionSplit>, ExpenseError>;
    async fn get_split(&self, split_id: &str) -> Result<Option<TransactionSplit>, ExpenseError>;
    async fn save_split(&self, split: TransactionSplit) -> Result<(), ExpenseError>;
    async fn delete_split(&self, split_id: &str) -> Result<(), ExpenseError>;
    async fn get_splits_by_transaction(&self, transaction_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError>;
    async fn get_splits_by_user(&self, user_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError>;

    async fn list_settlements(&self) -> Result<Vec<Settlement>, ExpenseError>;
    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<Settlement>, ExpenseError>;
    async fn save_settlement(&self, settlement: Settlement) -> Result<(), ExpenseError>;
    async fn delete_settlement(&self, settlement_id: &str) -> Result<(), ExpenseError>;
    async fn get_settlements_by_from_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError>;
    async fn get_settlements_by_to_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError>;
    async fn get_settlements_by_group(&self, group_id: &str) -> Result<Vec<Settlement>, ExpenseError>;
}

pub mod in_memory;
pub mod unavailable;
