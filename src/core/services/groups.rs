use super::ExpenseService;
use crate::core::errors::ExpenseError;
use crate::core::models::{Group, GroupMember, GroupUpdate, User};
use crate::core::validation::validate_text;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl<S: Storage> ExpenseService<S> {
    pub async fn add_group(&self, name: &str, description: Option<&str>) -> Result<Group, ExpenseError> {
        validate_text("name", name, &self.limits)?;
        if let Some(description) = description {
            validate_text("description", description, &self.limits)?;
        }

        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_group(group.clone()).await?;
        info!(group_id = %group.id, name = %group.name, "Group created");
        Ok(group)
    }

    pub async fn update_group(&self, group_id: &str, update: GroupUpdate) -> Result<Group, ExpenseError> {
        let mut group = self.require_group(group_id).await?;

        if let Some(name) = update.name {
            validate_text("name", &name, &self.limits)?;
            group.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            if let Some(description) = &description {
                validate_text("description", description, &self.limits)?;
            }
            group.description = description.map(|d| d.trim().to_string());
        }
        group.updated_at = Utc::now();

        self.storage.save_group(group.clone()).await?;
        info!(group_id, "Group updated");
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ExpenseError> {
        self.storage.get_group(group_id).await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, ExpenseError> {
        self.storage.list_groups().await
    }

    /// Removes a group and its memberships. Refused with `GroupHasLedgerEntries`
    /// while transactions or settlements are still tagged with it.
    pub async fn delete_group(&self, group_id: &str) -> Result<(), ExpenseError> {
        self.require_group(group_id).await?;

        let referenced = !self.storage.get_transactions_by_group(group_id).await?.is_empty()
            || !self.storage.get_settlements_by_group(group_id).await?.is_empty();
        if referenced {
            warn!(group_id, "refusing to delete group with ledger entries");
            return Err(ExpenseError::GroupHasLedgerEntries(group_id.to_string()));
        }

        for membership in self.storage.get_members_by_group(group_id).await? {
            self.storage.delete_group_member(&membership.id).await?;
        }
        self.storage.delete_group(group_id).await?;
        info!(group_id, "Group deleted");
        Ok(())
    }

    pub async fn add_member_to_group(&self, group_id: &str, user_id: &str) -> Result<GroupMember, ExpenseError> {
        self.require_group(group_id).await?;
        self.require_user(user_id).await?;

        if self.find_membership(group_id, user_id).await?.is_some() {
            warn!(group_id, user_id, "user is already a member");
            return Err(ExpenseError::AlreadyGroupMember(user_id.to_string()));
        }

        let member = GroupMember {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        self.storage.save_group_member(member.clone()).await?;
        info!(group_id, user_id, "Member added");
        Ok(member)
    }

    pub async fn remove_member_from_group(&self, group_id: &str, user_id: &str) -> Result<(), ExpenseError> {
        self.require_group(group_id).await?;
        let Some(membership) = self.find_membership(group_id, user_id).await? else {
            warn!(group_id, user_id, "cannot remove a non-member");
            return Err(ExpenseError::NotGroupMember(user_id.to_string()));
        };

        self.storage.delete_group_member(&membership.id).await?;
        info!(group_id, user_id, "Member removed");
        Ok(())
    }

    /// Members in the order they joined. Memberships pointing at a deleted user are skipped.
    pub async fn get_group_members(&self, group_id: &str) -> Result<Vec<User>, ExpenseError> {
        let mut users = Vec::new();
        for membership in self.storage.get_members_by_group(group_id).await? {
            match self.storage.get_user(&membership.user_id).await? {
                Some(user) => users.push(user),
                None => debug!(group_id, user_id = %membership.user_id, "membership without user"),
            }
        }
        Ok(users)
    }

    pub async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, ExpenseError> {
        let mut groups = Vec::new();
        for membership in self.storage.get_members_by_user(user_id).await? {
            if let Some(group) = self.storage.get_group(&membership.group_id).await? {
                groups.push(group);
            }
        }
        Ok(groups)
    }
}
