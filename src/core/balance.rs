//! Balance aggregation over transactions and their splits.
//!
//! Balances are never stored. Each call rescans its inputs, so two calls over
//! the same rows always agree. Amounts are summed at full precision and rounded
//! to cents once at the end.

use crate::constants::UNKNOWN_DISPLAY_NAME;
use crate::core::models::{GroupBalance, MemberBalance, SuggestedTransfer, Transaction, TransactionSplit, User, UserBalance};
use crate::core::money::{one_cent, round_cents};
use rust_decimal::Decimal;
use std::collections::HashMap;

fn index_transactions(transactions: &[Transaction]) -> HashMap<&str, &Transaction> {
    transactions.iter().map(|t| (t.id.as_str(), t)).collect()
}

/// Net position of `user_id` across every transaction in `transactions`.
///
/// Splits whose transaction is not in `transactions` are ignored.
pub fn user_balance(
    user_id: &str,
    user_name: Option<&str>,
    transactions: &[Transaction],
    splits: &[TransactionSplit],
) -> UserBalance {
    let by_id = index_transactions(transactions);
    let mut total_owed = Decimal::ZERO;
    let mut total_owing = Decimal::ZERO;

    for split in splits.iter().filter(|s| !s.is_settled) {
        let Some(transaction) = by_id.get(split.transaction_id.as_str()) else {
            continue;
        };
        if transaction.paid_by == user_id && split.user_id != user_id {
            total_owed += split.amount;
        } else if split.user_id == user_id && transaction.paid_by != user_id {
            total_owing += split.amount;
        }
    }

    UserBalance {
        user_id: user_id.to_string(),
        user_name: user_name.unwrap_or(UNKNOWN_DISPLAY_NAME).to_string(),
        total_owed: round_cents(total_owed),
        total_owing: round_cents(total_owing),
        net_balance: round_cents(total_owed - total_owing),
    }
}

/// Signed net positions of everyone touched by the group's unsettled splits.
///
/// Only transactions tagged with `group_id` count. Members appear in the order
/// they are first encountered.
pub fn group_balance(
    group_id: &str,
    group_name: Option<&str>,
    transactions: &[Transaction],
    splits: &[TransactionSplit],
    users: &[User],
) -> GroupBalance {
    let in_group: Vec<Transaction> = transactions.iter().filter(|t| t.is_in_group(group_id)).cloned().collect();
    let by_id = index_transactions(&in_group);

    let mut order: Vec<String> = Vec::new();
    let mut nets: HashMap<String, Decimal> = HashMap::new();
    let mut adjust = |user_id: &str, delta: Decimal| {
        if !nets.contains_key(user_id) {
            order.push(user_id.to_string());
        }
        *nets.entry(user_id.to_string()).or_insert(Decimal::ZERO) += delta;
    };

    for split in splits.iter().filter(|s| !s.is_settled) {
        let Some(transaction) = by_id.get(split.transaction_id.as_str()) else {
            continue;
        };
        if split.user_id == transaction.paid_by {
            continue;
        }
        adjust(transaction.paid_by.as_str(), split.amount);
        adjust(split.user_id.as_str(), -split.amount);
    }

    let total_owed: Decimal = nets.values().filter(|n| n.is_sign_positive()).copied().sum();
    let total_owing: Decimal = nets.values().filter(|n| n.is_sign_negative()).map(|n| n.abs()).sum();

    let names: HashMap<&str, &str> = users.iter().map(|u| (u.id.as_str(), u.name.as_str())).collect();
    let balances = order
        .into_iter()
        .map(|user_id| {
            let amount = nets.get(&user_id).copied().unwrap_or_default();
            MemberBalance {
                user_name: names.get(user_id.as_str()).copied().unwrap_or(UNKNOWN_DISPLAY_NAME).to_string(),
                amount: round_cents(amount),
                user_id,
            }
        })
        .collect();

    GroupBalance {
        group_id: group_id.to_string(),
        group_name: group_name.unwrap_or(UNKNOWN_DISPLAY_NAME).to_string(),
        total_owed: round_cents(total_owed),
        total_owing: round_cents(total_owing),
        balances,
    }
}

/// Greedy pairing of the largest creditor with the largest debtor until every
/// position is within a cent of zero. Display helper only; the settlement
/// allocator does not use it.
pub fn suggest_transfers(balance: &GroupBalance) -> Vec<SuggestedTransfer> {
    let mut positive: Vec<(String, Decimal)> = balance
        .balances
        .iter()
        .filter(|b| b.amount >= one_cent())
        .map(|b| (b.user_id.clone(), b.amount))
        .collect();
    let mut negative: Vec<(String, Decimal)> = balance
        .balances
        .iter()
        .filter(|b| b.amount <= -one_cent())
        .map(|b| (b.user_id.clone(), b.amount))
        .collect();

    positive.sort_by(|a, b| b.1.cmp(&a.1));
    negative.sort_by(|a, b| a.1.cmp(&b.1));

    let mut transfers = Vec::new();
    while !positive.is_empty() && !negative.is_empty() {
        let (creditor, credit) = positive[0].clone();
        let (debtor, debit) = negative[0].clone();
        let amount = credit.min(-debit);

        if amount >= one_cent() {
            transfers.push(SuggestedTransfer {
                from_user_id: debtor,
                to_user_id: creditor,
                amount,
            });
        }

        positive[0].1 -= amount;
        negative[0].1 += amount;

        if positive[0].1 < one_cent() {
            positive.remove(0);
        }
        if negative[0].1 > -one_cent() {
            negative.remove(0);
        }
        positive.sort_by(|a, b| b.1.cmp(&a.1));
        negative.sort_by(|a, b| a.1.cmp(&b.1));
    }

    transfers
}
