use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserBalance {
    pub user_id: String,
    pub user_name: String,
    /// Owed to this user by others.
    pub total_owed: Decimal,
    /// Owed by this user to others.
    pub total_owing: Decimal,
    pub net_balance: Decimal,
}

/// Signed net position of one user within a group. Positive means net creditor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    pub user_id: String,
    pub user_name: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupBalance {
    pub group_id: String,
    pub group_name: String,
    pub total_owed: Decimal,
    pub total_owing: Decimal,
    pub balances: Vec<MemberBalance>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTransfer {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: Decimal,
}
