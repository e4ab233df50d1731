use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A recorded real-world payment. Append-only: never edited once stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: Decimal,
    pub group_id: Option<String>,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct SettlementRequest {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: Decimal,
    pub group_id: Option<String>,
    pub note: Option<String>,
}

impl SettlementRequest {
    pub fn new(from_user_id: &str, to_user_id: &str, amount: Decimal) -> Self {
        SettlementRequest {
            from_user_id: from_user_id.to_string(),
            to_user_id: to_user_id.to_string(),
            amount,
            group_id: None,
            note: None,
        }
    }

    pub fn in_group(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Result of `settle_up`: the stored settlement plus which splits it retired.
#[derive(Clone, Debug, Serialize)]
pub struct SettlementOutcome {
    pub settlement: Settlement,
    pub settled_split_ids: Vec<String>,
    /// Part of the payment that did not fit any whole split.
    pub unallocated: Decimal,
}
