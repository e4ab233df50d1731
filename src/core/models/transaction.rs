use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Exact,
    Percentage,
    Shares,
}

impl std::fmt::Display for SplitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SplitType::Equal => "equal",
            SplitType::Exact => "exact",
            SplitType::Percentage => "percentage",
            SplitType::Shares => "shares",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub group_id: Option<String>,
    pub split_type: SplitType,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_in_group(&self, group_id: &str) -> bool {
        self.group_id.as_deref() == Some(group_id)
    }
}

/// One participant's share of a transaction.
///
/// `amount` is always the resolved monetary value; `percentage` and `shares`
/// are kept only for the policy that produced them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionSplit {
    pub id: String,
    pub transaction_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub percentage: Option<Decimal>,
    pub shares: Option<Decimal>,
    pub is_settled: bool,
    pub settled_at: Option<DateTime<Utc>>,
}

impl TransactionSplit {
    pub fn mark_settled(&mut self, at: DateTime<Utc>) {
        self.is_settled = true;
        self.settled_at = Some(at);
    }
}

/// Per-participant input for a split. Only the value matching the policy is read;
/// a missing value counts as zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitDetail {
    pub user_id: String,
    pub amount: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub shares: Option<Decimal>,
}

impl SplitDetail {
    pub fn participant(user_id: &str) -> Self {
        SplitDetail {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    pub fn exact(user_id: &str, amount: Decimal) -> Self {
        SplitDetail {
            amount: Some(amount),
            ..Self::participant(user_id)
        }
    }

    pub fn percentage(user_id: &str, percentage: Decimal) -> Self {
        SplitDetail {
            percentage: Some(percentage),
            ..Self::participant(user_id)
        }
    }

    pub fn shares(user_id: &str, shares: Decimal) -> Self {
        SplitDetail {
            shares: Some(shares),
            ..Self::participant(user_id)
        }
    }
}

/// Everything needed to create or replace a transaction and its splits.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub group_id: Option<String>,
    pub split_type: SplitType,
    pub participants: Vec<SplitDetail>,
    /// Defaults to today (UTC) when absent.
    pub date: Option<NaiveDate>,
}

impl TransactionDraft {
    /// An `equal` split among `participants`.
    pub fn equal(description: &str, amount: Decimal, paid_by: &str, participants: &[&str]) -> Self {
        TransactionDraft {
            description: description.to_string(),
            amount,
            paid_by: paid_by.to_string(),
            group_id: None,
            split_type: SplitType::Equal,
            participants: participants.iter().map(|id| SplitDetail::participant(id)).collect(),
            date: None,
        }
    }

    pub fn with_details(
        description: &str,
        amount: Decimal,
        paid_by: &str,
        split_type: SplitType,
        participants: Vec<SplitDetail>,
    ) -> Self {
        TransactionDraft {
            description: description.to_string(),
            amount,
            paid_by: paid_by.to_string(),
            group_id: None,
            split_type,
            participants,
            date: None,
        }
    }

    pub fn in_group(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
