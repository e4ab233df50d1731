use super::ExpenseService;
use crate::core::errors::ExpenseError;
use crate::core::models::{Transaction, TransactionDraft, TransactionSplit};
use crate::core::split::{build_splits, compute_shares};
use crate::core::validation::validate_draft;
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

impl<S: Storage> ExpenseService<S> {
    /// Records an expense and one split per participant.
    ///
    /// The transaction row is written first, then each split. A storage failure
    /// part way leaves the rows written so far in place.
    pub async fn add_transaction(&self, draft: TransactionDraft) -> Result<Transaction, ExpenseError> {
        validate_draft(&draft, &self.limits)?;
        self.validate_draft_references(&draft).await?;

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            paid_by: draft.paid_by.clone(),
            group_id: draft.group_id.clone(),
            split_type: draft.split_type,
            date: draft.date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
            updated_at: now,
        };

        self.storage.save_transaction(transaction.clone()).await?;
        self.write_splits(&transaction, &draft, now).await?;

        info!(
            transaction_id = %transaction.id,
            amount = %transaction.amount,
            paid_by = %transaction.paid_by,
            split_type = %transaction.split_type,
            participants = draft.participants.len(),
            "Transaction added"
        );
        Ok(transaction)
    }

    /// Replaces a transaction's values and regenerates its splits.
    ///
    /// `id` and `created_at` survive; every old split is dropped, so any
    /// settlement state they carried is reset.
    pub async fn update_transaction(&self, transaction_id: &str, draft: TransactionDraft) -> Result<Transaction, ExpenseError> {
        let existing = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| ExpenseError::TransactionNotFound(transaction_id.to_string()))?;
        validate_draft(&draft, &self.limits)?;
        self.validate_draft_references(&draft).await?;

        let now = Utc::now();
        let transaction = Transaction {
            id: existing.id,
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            paid_by: draft.paid_by.clone(),
            group_id: draft.group_id.clone(),
            split_type: draft.split_type,
            date: draft.date.unwrap_or(existing.date),
            created_at: existing.created_at,
            updated_at: now,
        };

        self.delete_splits_of(transaction_id).await?;
        self.storage.save_transaction(transaction.clone()).await?;
        self.write_splits(&transaction, &draft, now).await?;

        info!(transaction_id, amount = %transaction.amount, "Transaction updated");
        Ok(transaction)
    }

    /// Deletes a transaction after its splits.
    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<(), ExpenseError> {
        if self.storage.get_transaction(transaction_id).await?.is_none() {
            return Err(ExpenseError::TransactionNotFound(transaction_id.to_string()));
        }
        self.delete_splits_of(transaction_id).await?;
        self.storage.delete_transaction(transaction_id).await?;
        info!(transaction_id, "Transaction deleted");
        Ok(())
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, ExpenseError> {
        self.storage.get_transaction(transaction_id).await
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ExpenseError> {
        self.storage.list_transactions().await
    }

    pub async fn get_group_transactions(&self, group_id: &str) -> Result<Vec<Transaction>, ExpenseError> {
        self.storage.get_transactions_by_group(group_id).await
    }

    pub async fn get_transaction_splits(&self, transaction_id: &str) -> Result<Vec<TransactionSplit>, ExpenseError> {
        self.storage.get_splits_by_transaction(transaction_id).await
    }

    /// Payer and participants must exist; in a group they must also be members.
    async fn validate_draft_references(&self, draft: &TransactionDraft) -> Result<(), ExpenseError> {
        let mut user_ids = vec![draft.paid_by.as_str()];
        user_ids.extend(
            draft
                .participants
                .iter()
                .map(|p| p.user_id.as_str())
                .filter(|id| *id != draft.paid_by),
        );
        self.validate_users(&user_ids).await?;

        if let Some(group_id) = &draft.group_id {
            self.require_group(group_id).await?;
            self.validate_group_membership(group_id, &user_ids).await?;
        }
        Ok(())
    }

    async fn write_splits(
        &self,
        transaction: &Transaction,
        draft: &TransactionDraft,
        now: DateTime<Utc>,
    ) -> Result<(), ExpenseError> {
        let shares = compute_shares(transaction.amount, transaction.split_type, &draft.participants);
        let splits = build_splits(transaction, shares, now);
        let total = splits.len();

        for (written, split) in splits.into_iter().enumerate() {
            debug!(transaction_id = %transaction.id, user_id = %split.user_id, amount = %split.amount, "writing split");
            if let Err(e) = self.storage.save_split(split).await {
                error!(
                    transaction_id = %transaction.id,
                    written,
                    total,
                    error = %e,
                    "split write failed, transaction left partially applied"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    async fn delete_splits_of(&self, transaction_id: &str) -> Result<(), ExpenseError> {
        for split in self.storage.get_splits_by_transaction(transaction_id).await? {
            self.storage.delete_split(&split.id).await?;
        }
        Ok(())
    }
}
