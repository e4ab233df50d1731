use super::ExpenseService;
use crate::core::errors::ExpenseError;
use crate::core::models::{User, UserUpdate};
use crate::core::validation::{validate_email, validate_text};
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl<S: Storage> ExpenseService<S> {
    pub async fn add_user(&self, name: &str, email: Option<&str>) -> Result<User, ExpenseError> {
        validate_text("name", name, &self.limits)?;
        if let Some(email) = email {
            validate_email(email)?;
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_user(user.clone()).await?;
        info!(user_id = %user.id, name = %user.name, "User added");
        Ok(user)
    }

    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User, ExpenseError> {
        let mut user = self.require_user(user_id).await?;

        if let Some(name) = update.name {
            validate_text("name", &name, &self.limits)?;
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            if let Some(email) = &email {
                validate_email(email)?;
            }
            user.email = email;
        }
        user.updated_at = Utc::now();

        self.storage.save_user(user.clone()).await?;
        info!(user_id, "User updated");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, ExpenseError> {
        self.storage.get_user(user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ExpenseError> {
        self.storage.list_users().await
    }

    /// Removes a user and their group memberships.
    ///
    /// Refused with `UserHasLedgerEntries` while any transaction, split or
    /// settlement still names the user.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), ExpenseError> {
        self.require_user(user_id).await?;

        let referenced = !self.storage.get_transactions_by_payer(user_id).await?.is_empty()
            || !self.storage.get_splits_by_user(user_id).await?.is_empty()
            || !self.storage.get_settlements_by_from_user(user_id).await?.is_empty()
            || !self.storage.get_settlements_by_to_user(user_id).await?.is_empty();
        if referenced {
            warn!(user_id, "refusing to delete user with ledger entries");
            return Err(ExpenseError::UserHasLedgerEntries(user_id.to_string()));
        }

        for membership in self.storage.get_members_by_user(user_id).await? {
            debug!(user_id, group_id = %membership.group_id, "dropping membership");
            self.storage.delete_group_member(&membership.id).await?;
        }
        self.storage.delete_user(user_id).await?;
        info!(user_id, "User deleted");
        Ok(())
    }
}
