use crate::core::errors::ExpenseError;
use crate::core::models::{Entity, Group, GroupMember, Settlement, Transaction, TransactionSplit, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Rows of one entity kind, kept in insertion order.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
}

impl<T: Entity + Clone> Table<T> {
    fn new() -> Self {
        Table { rows: Vec::new() }
    }

    fn all(&self) -> Vec<T> {
        self.rows.clone()
    }

    fn get(&self, id: &str) -> Option<T> {
        self.rows.iter().find(|r| r.id() == id).cloned()
    }

    /// Replaces an existing row in place, otherwise appends.
    fn put(&mut self, row: T) {
        match self.rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    fn delete(&mut self, id: &str) {
        self.rows.retain(|r| r.id() != id);
    }

    fn filter<F: Fn(&T) -> bool>(&self, predicate: F) -> Vec<T> {
        self.rows.iter().filter(|r| predicate(*r)).cloned().collect()
    }
}

#[derive(Clone)]
pub struct InMemoryStorage {
    users: Arc<RwLock<Table<User>>>,
    groups: Arc<RwLock<Table<Group>>>,
    group_members: Arc<RwLock<Table<GroupMember>>>,
    transactions: Arc<RwLock<Table<Transaction>>>,
    splits: Arc<RwLock<Table<TransactionSplit>>>,
    settlements: Arc<RwLock<Table<Settlement>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Arc::new(RwLock::new(Table::new())),
            groups: Arc::new(RwLock::new(Table::new())),
            group_members: Arc::new(RwLock::new(Table::new())),
            transactions: Arc::new(RwLock::new(Table::new())),
            splits: Arc::new(RwLock::new(Table::new())),
            settlements: Arc::new(RwLock::new(Table::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_users(&self) -> Result<Vec<User>, ExpenseError> {
        Ok(self.users.read().await.all())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ExpenseError> {
        Ok(self.users.read().await.get(user_id))
    }

    async fn save_user(&self, user: User) -> Result<(), ExpenseError> {
        self.users.write().await.put(user);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), ExpenseError> {
        self.users.write().await.delete(user_id);
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ExpenseError> {
        Ok(self.groups.read().await.all())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ExpenseError> {
        Ok(self.groups.read().await.get(group_id))
    }

    async fn save_group(&self, group: Group) -> Result<(), ExpenseError> {
        self.groups.write().await.put(group);
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), ExpenseError> {
        self.groups.write().await.delete(group_id);
        Ok(())
    }

    async fn list_group_members(&self) -> Result<Vec<GroupMember>, ExpenseError> {
        Ok(self.group_members.read().await.all())
    }

    async fn get_group_member(&self, member_id: &str) -> Result<Option<GroupMember>, ExpenseError> {
        Ok(self.group_members.read().await.get(member_id))
    }

    async fn save_group_member(&self, member: GroupMember) -> Result<(), ExpenseError> {
        self.group_members.write().await.put(member);
        Ok(())
    }

    async fn delete_group_member(&self, member_id: &str) -> Result<(), ExpenseError> {
        self.group_members.write().await.delete(member_id);
        Ok(())
    }

    async fn get_members_by_group(&self, group_id: &str) -> Result<Vec<GroupMember>, ExpenseError> {
        Ok(self.group_members.read().await.filter(|m| m.group_id == group_id))
    }

    async fn get_members_by_user(&self, user_id: &str) -> Result<Vec<GroupMember>, ExpenseError> {
        Ok(self.group_members.read().await.filter(|m| m.user_id == user_id))
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self.transactions.read().await.all())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, ExpenseError> {
        Ok(self.transactions.read().await.get(transaction_id))
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), ExpenseError> {
        self.transactions.write().await.put(transaction);
        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), ExpenseError> {
        self.transactions.write().await.delete(transaction_id);
        Ok(())
    }

    async fn get_transactions_by_group(&self, group_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self.transactions.read().await.filter(|t| t.is_in_group(group_id)))
    }

    async fn get_transactions_by_payer(&self, user_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self.transactions.read().await.filter(|t| t.paid_by == user_id))
    }

    async fn list_splits(&self) -> Result<Vec<TransactionSplit>, ExpenseError> {
        Ok(self.splits.read().await.all())
    }

    async fn get_split(&self, split_id: &str) -> Result<Option<TransactionSplit>, ExpenseError> {
        Ok(self.splits.read().await.get(split_id))
    }

    async fn save_split(&self, split: TransactionSplit) -> Result<(), ExpenseError> {
        self.splits.write().await.put(split);
        Ok(())
    }

    async fn delete_split(&self, split_id: &str) -> Result<(), ExpenseError> {
        self.splits.write().await.delete(split_id);
        Ok(())
    }

    async fn get_splits_by_transaction(&self, transaction_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        Ok(self.splits.read().await.filter(|s| s.transaction_id == transaction_id))
    }

    async fn get_splits_by_user(&self, user_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        Ok(self.splits.read().await.filter(|s| s.user_id == user_id))
    }

    async fn list_settlements(&self) -> Result<Vec<Settlement>, ExpenseError> {
        Ok(self.settlements.read().await.all())
    }

    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<Settlement>, ExpenseError> {
        Ok(self.settlements.read().await.get(settlement_id))
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), ExpenseError> {
        self.settlements.write().await.put(settlement);
        Ok(())
    }

    async fn delete_settlement(&self, settlement_id: &str) -> Result<(), ExpenseError> {
        self.settlements.write().await.delete(settlement_id);
        Ok(())
    }

    async fn get_settlements_by_from_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        Ok(self.settlements.read().await.filter(|s| s.from_user_id == user_id))
    }

    async fn get_settlements_by_to_user(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        Ok(self.settlements.read().await.filter(|s| s.to_user_id == user_id))
    }

    async fn get_settlements_by_group(&self, group_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        Ok(self.settlements.read().await.filter(|s| s.group_id.as_deref() == Some(group_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(id: &str, group_id: &str, user_id: &str) -> GroupMember {
        GroupMember {
            id: id.to_string(),
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn put_replaces_in_place_and_keeps_order() {
        let storage = InMemoryStorage::new();
        storage.save_group_member(member("m1", "g1", "a")).await.unwrap();
        storage.save_group_member(member("m2", "g1", "b")).await.unwrap();
        storage.save_group_member(member("m1", "g2", "a")).await.unwrap();

        let all = storage.list_group_members().await.unwrap();
        assert_eq!(all.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), vec!["m1", "m2"]);
        assert_eq!(all[0].group_id, "g2");
        assert_eq!(storage.get_members_by_group("g1").await.unwrap().len(), 1);
        assert_eq!(storage.get_members_by_user("a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_only_the_row() {
        let storage = InMemoryStorage::new();
        storage.save_group_member(member("m1", "g1", "a")).await.unwrap();
        storage.save_group_member(member("m2", "g1", "b")).await.unwrap();

        storage.delete_group_member("m1").await.unwrap();
        assert!(storage.get_group_member("m1").await.unwrap().is_none());
        assert!(storage.get_group_member("m2").await.unwrap().is_some());
    }
}
