use super::ExpenseService;
use crate::core::errors::ExpenseError;
use crate::core::models::{Settlement, SettlementOutcome, SettlementRequest};
use crate::core::settlement::{allocate, select_candidates};
use crate::core::validation::validate_settlement;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

impl<S: Storage> ExpenseService<S> {
    /// Records a payment from `from_user_id` to `to_user_id` and retires the
    /// whole splits it covers.
    ///
    /// The settlement row is stored before any split is touched. Splits are
    /// walked in stored order and each one is marked settled only if it fits in
    /// what is left of the payment; the rest stays in `unallocated`.
    pub async fn settle_up(&self, request: SettlementRequest) -> Result<SettlementOutcome, ExpenseError> {
        validate_settlement(&request, &self.limits)?;
        let parties = [request.from_user_id.as_str(), request.to_user_id.as_str()];
        self.validate_users(&parties).await?;
        if let Some(group_id) = &request.group_id {
            self.require_group(group_id).await?;
            self.validate_group_membership(group_id, &parties).await?;
        }

        let now = Utc::now();
        let settlement = Settlement {
            id: Uuid::new_v4().to_string(),
            from_user_id: request.from_user_id.clone(),
            to_user_id: request.to_user_id.clone(),
            amount: request.amount,
            group_id: request.group_id.clone(),
            note: request.note.as_ref().map(|n| n.trim().to_string()),
            date: now,
            created_at: now,
        };
        self.storage.save_settlement(settlement.clone()).await?;

        let splits = self.storage.get_splits_by_user(&request.from_user_id).await?;
        let transactions = self.storage.get_transactions_by_payer(&request.to_user_id).await?;
        let candidates = select_candidates(
            &request.from_user_id,
            &request.to_user_id,
            request.group_id.as_deref(),
            &transactions,
            &splits,
        );
        let allocation = allocate(request.amount, &candidates);
        debug!(
            settlement_id = %settlement.id,
            candidates = candidates.len(),
            settled = allocation.settled_split_ids.len(),
            remaining = %allocation.remaining,
            "allocated settlement"
        );

        for split in candidates
            .into_iter()
            .filter(|s| allocation.settled_split_ids.contains(&s.id))
        {
            let mut split = split.clone();
            let split_id = split.id.clone();
            split.mark_settled(now);
            if let Err(e) = self.storage.save_split(split).await {
                error!(
                    settlement_id = %settlement.id,
                    split_id = %split_id,
                    error = %e,
                    "settlement recorded but split could not be marked settled"
                );
                return Err(e);
            }
        }

        info!(
            settlement_id = %settlement.id,
            from = %settlement.from_user_id,
            to = %settlement.to_user_id,
            amount = %settlement.amount,
            unallocated = %allocation.remaining,
            "Settlement recorded"
        );
        Ok(SettlementOutcome {
            settlement,
            settled_split_ids: allocation.settled_split_ids,
            unallocated: allocation.remaining,
        })
    }

    pub async fn list_settlements(&self) -> Result<Vec<Settlement>, ExpenseError> {
        self.storage.list_settlements().await
    }

    /// Settlements the user paid or received, oldest first.
    pub async fn get_user_settlements(&self, user_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        let mut settlements = self.storage.get_settlements_by_from_user(user_id).await?;
        settlements.extend(self.storage.get_settlements_by_to_user(user_id).await?);
        settlements.sort_by_key(|s| s.created_at);
        Ok(settlements)
    }

    pub async fn get_group_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, ExpenseError> {
        self.storage.get_settlements_by_group(group_id).await
    }
}
