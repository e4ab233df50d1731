use super::ExpenseService;
use crate::core::balance::{group_balance, suggest_transfers, user_balance};
use crate::core::errors::ExpenseError;
use crate::core::models::{GroupBalance, SuggestedTransfer, UserBalance};
use crate::infrastructure::storage::Storage;
use rust_decimal::Decimal;
use tracing::debug;

// Balances are recomputed from the stored rows on every call.
impl<S: Storage> ExpenseService<S> {
    /// Unknown ids come back zeroed under the "Unknown" name rather than as an error.
    pub async fn get_user_balance(&self, user_id: &str) -> Result<UserBalance, ExpenseError> {
        let user = self.storage.get_user(user_id).await?;
        let transactions = self.storage.list_transactions().await?;
        let splits = self.storage.list_splits().await?;

        let balance = user_balance(user_id, user.as_ref().map(|u| u.name.as_str()), &transactions, &splits);
        debug!(user_id, net = %balance.net_balance, "computed user balance");
        Ok(balance)
    }

    pub async fn get_group_balance(&self, group_id: &str) -> Result<GroupBalance, ExpenseError> {
        let group = self.storage.get_group(group_id).await?;
        let transactions = self.storage.get_transactions_by_group(group_id).await?;
        let mut splits = Vec::new();
        for transaction in &transactions {
            splits.extend(self.storage.get_splits_by_transaction(&transaction.id).await?);
        }
        let users = self.storage.list_users().await?;

        let balance = group_balance(
            group_id,
            group.as_ref().map(|g| g.name.as_str()),
            &transactions,
            &splits,
            &users,
        );
        debug!(group_id, owed = %balance.total_owed, owing = %balance.total_owing, "computed group balance");
        Ok(balance)
    }

    /// One balance per stored user, in user order.
    pub async fn get_all_balances(&self) -> Result<Vec<UserBalance>, ExpenseError> {
        let users = self.storage.list_users().await?;
        let transactions = self.storage.list_transactions().await?;
        let splits = self.storage.list_splits().await?;

        Ok(users
            .iter()
            .map(|u| user_balance(&u.id, Some(u.name.as_str()), &transactions, &splits))
            .collect())
    }

    pub async fn get_unsettled_amount_with_user(&self, user_id: &str) -> Result<Decimal, ExpenseError> {
        Ok(self.get_user_balance(user_id).await?.net_balance.abs())
    }

    pub async fn get_unsettled_amount_with_group(&self, group_id: &str) -> Result<Decimal, ExpenseError> {
        let balance = self.get_group_balance(group_id).await?;
        Ok(balance.total_owed.max(balance.total_owing))
    }

    pub async fn suggest_group_transfers(&self, group_id: &str) -> Result<Vec<SuggestedTransfer>, ExpenseError> {
        let balance = self.get_group_balance(group_id).await?;
        Ok(suggest_transfers(&balance))
    }
}
