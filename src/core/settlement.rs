//! Settlement allocation.
//!
//! A payment from `from` to `to` retires whole outstanding splits in their
//! stored order. A split is settled only if it fits entirely in what is left of
//! the payment; a split that does not fit is skipped, never partially settled,
//! and the walk moves on to the next candidate. Whatever is left when the
//! candidates run out stays unallocated.

use crate::core::models::{Transaction, TransactionSplit};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub settled_split_ids: Vec<String>,
    pub remaining: Decimal,
}

/// Unsettled splits owed by `from_user_id` on transactions paid by `to_user_id`,
/// restricted to `group_id` when given. Keeps the order of `splits`.
pub fn select_candidates<'a>(
    from_user_id: &str,
    to_user_id: &str,
    group_id: Option<&str>,
    transactions: &[Transaction],
    splits: &'a [TransactionSplit],
) -> Vec<&'a TransactionSplit> {
    let by_id: HashMap<&str, &Transaction> = transactions.iter().map(|t| (t.id.as_str(), t)).collect();

    splits
        .iter()
        .filter(|split| !split.is_settled && split.user_id == from_user_id)
        .filter(|split| {
            by_id.get(split.transaction_id.as_str()).is_some_and(|transaction| {
                transaction.paid_by == to_user_id && group_id.is_none_or(|g| transaction.is_in_group(g))
            })
        })
        .collect()
}

/// First-fit walk over `candidates`.
pub fn allocate(amount: Decimal, candidates: &[&TransactionSplit]) -> Allocation {
    let mut remaining = amount;
    let mut settled_split_ids = Vec::new();

    for split in candidates {
        if remaining <= Decimal::ZERO {
            break;
        }
        if split.amount <= remaining {
            settled_split_ids.push(split.id.clone());
            remaining -= split.amount;
        }
    }

    Allocation {
        settled_split_ids,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SplitType;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn transaction(id: &str, paid_by: &str, group_id: Option<&str>) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: id.to_string(),
            description: id.to_string(),
            amount: dec!(100),
            paid_by: paid_by.to_string(),
            group_id: group_id.map(String::from),
            split_type: SplitType::Exact,
            date: now.date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    fn split(id: &str, transaction_id: &str, user_id: &str, amount: Decimal) -> TransactionSplit {
        TransactionSplit {
            id: id.to_string(),
            transaction_id: transaction_id.to_string(),
            user_id: user_id.to_string(),
            amount,
            percentage: None,
            shares: None,
            is_settled: false,
            settled_at: None,
        }
    }

    #[test]
    fn smaller_split_settles_while_larger_is_skipped() {
        let transactions = vec![transaction("t1", "a", None), transaction("t2", "a", None)];
        let splits = vec![split("s30", "t1", "b", dec!(30)), split("s20", "t2", "b", dec!(20))];

        let candidates = select_candidates("b", "a", None, &transactions, &splits);
        let allocation = allocate(dec!(25), &candidates);

        assert_eq!(allocation.settled_split_ids, vec!["s20".to_string()]);
        assert_eq!(allocation.remaining, dec!(5));
    }

    #[test]
    fn payment_below_every_split_settles_nothing() {
        let transactions = vec![transaction("t1", "a", None)];
        let splits = vec![split("s1", "t1", "b", dec!(30))];
        let candidates = select_candidates("b", "a", None, &transactions, &splits);

        let allocation = allocate(dec!(10), &candidates);
        assert!(allocation.settled_split_ids.is_empty());
        assert_eq!(allocation.remaining, dec!(10));
    }

    #[test]
    fn walk_stops_once_payment_is_used_up() {
        let transactions = vec![transaction("t1", "a", None)];
        let splits = vec![
            split("s1", "t1", "b", dec!(10)),
            split("s2", "t1", "b", dec!(15)),
            split("s3", "t1", "b", dec!(5)),
        ];
        let candidates = select_candidates("b", "a", None, &transactions, &splits);

        let allocation = allocate(dec!(25), &candidates);
        assert_eq!(allocation.settled_split_ids, vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(allocation.remaining, Decimal::ZERO);
    }

    #[test]
    fn candidates_respect_direction_and_group() {
        let transactions = vec![
            transaction("t1", "a", Some("g1")),
            transaction("t2", "a", Some("g2")),
            transaction("t3", "c", Some("g1")),
        ];
        let mut settled = split("s0", "t1", "b", dec!(1));
        settled.is_settled = true;
        let splits = vec![
            settled,
            split("s1", "t1", "b", dec!(10)),
            split("s2", "t2", "b", dec!(10)),
            split("s3", "t3", "b", dec!(10)),
            split("s4", "t1", "c", dec!(10)),
        ];

        let all: Vec<&str> = select_candidates("b", "a", None, &transactions, &splits)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(all, vec!["s1", "s2"]);

        let scoped: Vec<&str> = select_candidates("b", "a", Some("g1"), &transactions, &splits)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(scoped, vec!["s1"]);
    }
}
