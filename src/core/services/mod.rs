//! `ExpenseService` ties validation, the ledger algorithms and storage together.
//!
//! The service holds no ledger state of its own: every call reads what it needs
//! through the `Storage` handle. Multi-row writes (a transaction and its splits,
//! a settlement and the splits it retires) are issued one row at a time with no
//! rollback. When a later write fails the earlier ones stay applied; the failure
//! is logged at `error` level and returned to the caller.

mod balances;
mod groups;
mod settlements;
mod transactions;
mod users;

use crate::config::Limits;
use crate::core::errors::ExpenseError;
use crate::core::models::{Group, GroupMember, User};
use crate::infrastructure::storage::Storage;
use tracing::{info, warn};

pub struct ExpenseService<S: Storage> {
    storage: S,
    limits: Limits,
}

impl<S: Storage> ExpenseService<S> {
    pub fn new(storage: S) -> Self {
        Self::with_limits(storage, Limits::default())
    }

    pub fn with_limits(storage: S, limits: Limits) -> Self {
        info!(?limits, "Initializing ExpenseService");
        ExpenseService { storage, limits }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    async fn require_user(&self, user_id: &str) -> Result<User, ExpenseError> {
        self.storage.get_user(user_id).await?.ok_or_else(|| {
            warn!(user_id, "user not found");
            ExpenseError::UserNotFound(user_id.to_string())
        })
    }

    async fn require_group(&self, group_id: &str) -> Result<Group, ExpenseError> {
        self.storage.get_group(group_id).await?.ok_or_else(|| {
            warn!(group_id, "group not found");
            ExpenseError::GroupNotFound(group_id.to_string())
        })
    }

    pub async fn validate_users(&self, user_ids: &[&str]) -> Result<(), ExpenseError> {
        for &user_id in user_ids {
            self.require_user(user_id).await?;
        }
        Ok(())
    }

    async fn find_membership(&self, group_id: &str, user_id: &str) -> Result<Option<GroupMember>, ExpenseError> {
        Ok(self
            .storage
            .get_members_by_group(group_id)
            .await?
            .into_iter()
            .find(|m| m.user_id == user_id))
    }

    /// Fails with `NotGroupMember` for the first id without a membership row in `group_id`.
    async fn validate_group_membership(&self, group_id: &str, user_ids: &[&str]) -> Result<(), ExpenseError> {
        let members = self.storage.get_members_by_group(group_id).await?;
        for &user_id in user_ids {
            if !members.iter().any(|m| m.user_id == user_id) {
                warn!(group_id, user_id, "user is not a member of the group");
                return Err(ExpenseError::NotGroupMember(user_id.to_string()));
            }
        }
        Ok(())
    }
}
