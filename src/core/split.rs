//! Split calculator.
//!
//! Turns a transaction amount, a participant list and a split policy into one
//! owed amount per participant. Inputs are assumed validated: the amount is
//! positive, participants are non-empty and unique, and `exact`/`percentage`
//! values add up within tolerance.
//!
//! Rounding: `exact` values are rounded to cents on their own. For the computed
//! policies (`equal`, `percentage`, `shares`) the largest-remainder method is
//! used: every raw share is truncated to whole cents, then the cents still
//! missing from the transaction amount are given one at a time to the
//! participants with the largest truncated remainder, earlier participants
//! winning ties. Percentages and shares are weighted by their own sum, so the
//! splits always add up to the amount exactly.
//! `$10.00` split three ways is therefore `3.34, 3.33, 3.33`.

use crate::core::models::{SplitDetail, SplitType, Transaction, TransactionSplit};
use crate::core::money::{one_cent, round_cents, truncate_cents};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A participant's resolved share before it is persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedShare {
    pub user_id: String,
    pub amount: Decimal,
    pub percentage: Option<Decimal>,
    pub shares: Option<Decimal>,
}

pub fn compute_shares(amount: Decimal, split_type: SplitType, participants: &[SplitDetail]) -> Vec<ComputedShare> {
    if participants.is_empty() {
        return Vec::new();
    }
    match split_type {
        SplitType::Equal => {
            let count = Decimal::from(participants.len());
            let raw = vec![amount / count; participants.len()];
            distribute(participants, raw, round_cents(amount), |_| (None, None))
        }
        SplitType::Exact => participants
            .iter()
            .map(|p| ComputedShare {
                user_id: p.user_id.clone(),
                amount: round_cents(p.amount.unwrap_or_default()),
                percentage: None,
                shares: None,
            })
            .collect(),
        SplitType::Percentage => {
            // Scaled by the actual total so percentages within tolerance of 100 still cover the amount.
            let total_percentage: Decimal = participants.iter().map(|p| p.percentage.unwrap_or_default()).sum();
            let (raw, target) = proportional(amount, total_percentage, participants, |p| p.percentage);
            distribute(participants, raw, target, |p| (Some(p.percentage.unwrap_or_default()), None))
        }
        SplitType::Shares => {
            let total_shares: Decimal = participants.iter().map(|p| p.shares.unwrap_or_default()).sum();
            let (raw, target) = proportional(amount, total_shares, participants, |p| p.shares);
            distribute(participants, raw, target, |p| (None, Some(p.shares.unwrap_or_default())))
        }
    }
}

/// Raw shares of `amount` weighted by `weight / total`, and the total they must reach.
/// A zero `total` gives every participant nothing.
fn proportional<W>(amount: Decimal, total: Decimal, participants: &[SplitDetail], weight: W) -> (Vec<Decimal>, Decimal)
where
    W: Fn(&SplitDetail) -> Option<Decimal>,
{
    if total.is_zero() {
        return (vec![Decimal::ZERO; participants.len()], Decimal::ZERO);
    }
    let raw = participants
        .iter()
        .map(|p| amount * weight(p).unwrap_or_default() / total)
        .collect();
    (raw, round_cents(amount))
}

fn distribute<F>(participants: &[SplitDetail], raw: Vec<Decimal>, target: Decimal, policy_values: F) -> Vec<ComputedShare>
where
    F: Fn(&SplitDetail) -> (Option<Decimal>, Option<Decimal>),
{
    let mut amounts: Vec<Decimal> = raw.iter().map(|r| truncate_cents(*r)).collect();
    let allocated: Decimal = amounts.iter().copied().sum();

    let mut order: Vec<usize> = (0..raw.len()).collect();
    // stable sort keeps participant order among equal remainders
    order.sort_by(|a, b| (raw[*b] - amounts[*b]).cmp(&(raw[*a] - amounts[*a])));

    let mut missing = target - allocated;
    for index in order.iter().cycle() {
        if missing < one_cent() {
            break;
        }
        amounts[*index] += one_cent();
        missing -= one_cent();
    }
    for index in order.iter().rev().cycle() {
        if missing > -one_cent() {
            break;
        }
        amounts[*index] -= one_cent();
        missing += one_cent();
    }

    participants
        .iter()
        .zip(amounts)
        .map(|(p, amount)| {
            let (percentage, shares) = policy_values(p);
            ComputedShare {
                user_id: p.user_id.clone(),
                amount,
                percentage,
                shares,
            }
        })
        .collect()
}

/// Builds the split rows for `transaction`. The payer's own row is created settled.
pub fn build_splits(transaction: &Transaction, shares: Vec<ComputedShare>, now: DateTime<Utc>) -> Vec<TransactionSplit> {
    shares
        .into_iter()
        .map(|share| {
            let is_payer = share.user_id == transaction.paid_by;
            TransactionSplit {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction.id.clone(),
                user_id: share.user_id,
                amount: share.amount,
                percentage: share.percentage,
                shares: share.shares,
                is_settled: is_payer,
                settled_at: is_payer.then_some(now),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amounts(shares: &[ComputedShare]) -> Vec<Decimal> {
        shares.iter().map(|s| s.amount).collect()
    }

    fn total(shares: &[ComputedShare]) -> Decimal {
        shares.iter().map(|s| s.amount).sum()
    }

    #[test]
    fn equal_split_hands_leftover_cents_to_first_participants() {
        let participants = vec![
            SplitDetail::participant("a"),
            SplitDetail::participant("b"),
            SplitDetail::participant("c"),
        ];
        let shares = compute_shares(dec!(10.00), SplitType::Equal, &participants);
        assert_eq!(amounts(&shares), vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
        assert_eq!(total(&shares), dec!(10.00));
    }

    #[test]
    fn equal_split_of_even_amount_is_exact() {
        let participants = vec![SplitDetail::participant("a"), SplitDetail::participant("b")];
        let shares = compute_shares(dec!(100), SplitType::Equal, &participants);
        assert_eq!(amounts(&shares), vec![dec!(50), dec!(50)]);
    }

    #[test]
    fn equal_split_conserves_awkward_totals() {
        let participants: Vec<SplitDetail> = (0..7).map(|i| SplitDetail::participant(&i.to_string())).collect();
        for amount in [dec!(0.01), dec!(0.05), dec!(1.00), dec!(99.99), dec!(1234.56)] {
            let shares = compute_shares(amount, SplitType::Equal, &participants);
            assert_eq!(total(&shares), amount, "amount {}", amount);
        }
    }

    #[test]
    fn exact_split_keeps_supplied_values() {
        let participants = vec![SplitDetail::exact("a", dec!(12.50)), SplitDetail::exact("b", dec!(7.5))];
        let shares = compute_shares(dec!(20), SplitType::Exact, &participants);
        assert_eq!(amounts(&shares), vec![dec!(12.50), dec!(7.50)]);
        assert!(shares.iter().all(|s| s.percentage.is_none() && s.shares.is_none()));
    }

    #[test]
    fn percentage_split_conserves_total() {
        let participants = vec![
            SplitDetail::percentage("a", dec!(33.33)),
            SplitDetail::percentage("b", dec!(33.33)),
            SplitDetail::percentage("c", dec!(33.34)),
        ];
        let shares = compute_shares(dec!(10), SplitType::Percentage, &participants);
        assert_eq!(total(&shares), dec!(10));
        assert_eq!(shares[2].percentage, Some(dec!(33.34)));
    }

    #[test]
    fn percentages_at_tolerance_edge_still_cover_amount() {
        for (a, b) in [(dec!(50), dec!(49.99)), (dec!(50), dec!(50.01))] {
            let participants = vec![SplitDetail::percentage("a", a), SplitDetail::percentage("b", b)];
            let draft = crate::core::models::TransactionDraft::with_details(
                "Rent",
                dec!(1000),
                "a",
                SplitType::Percentage,
                participants.clone(),
            );
            assert!(crate::core::validation::validate_draft(&draft, &crate::config::Limits::default()).is_ok());

            let shares = compute_shares(dec!(1000), SplitType::Percentage, &participants);
            assert_eq!(total(&shares), dec!(1000), "percentages {} / {}", a, b);
            assert_eq!(shares[1].percentage, Some(b));
        }
    }

    #[test]
    fn shares_split_is_proportional() {
        let participants = vec![SplitDetail::shares("a", dec!(2)), SplitDetail::shares("b", dec!(1))];
        let shares = compute_shares(dec!(90), SplitType::Shares, &participants);
        assert_eq!(amounts(&shares), vec![dec!(60), dec!(30)]);
        assert_eq!(shares[0].shares, Some(dec!(2)));
    }

    #[test]
    fn zero_total_shares_yield_zero_amounts() {
        let participants = vec![SplitDetail::shares("a", dec!(0)), SplitDetail::participant("b")];
        let shares = compute_shares(dec!(50), SplitType::Shares, &participants);
        assert_eq!(amounts(&shares), vec![Decimal::ZERO, Decimal::ZERO]);
    }

    #[test]
    fn payer_split_is_created_settled() {
        let now = Utc::now();
        let transaction = Transaction {
            id: "t1".to_string(),
            description: "Dinner".to_string(),
            amount: dec!(90),
            paid_by: "a".to_string(),
            group_id: None,
            split_type: SplitType::Equal,
            date: now.date_naive(),
            created_at: now,
            updated_at: now,
        };
        let participants = vec![
            SplitDetail::participant("a"),
            SplitDetail::participant("b"),
            SplitDetail::participant("c"),
        ];
        let splits = build_splits(&transaction, compute_shares(dec!(90), SplitType::Equal, &participants), now);

        assert_eq!(splits.len(), 3);
        assert!(splits[0].is_settled);
        assert_eq!(splits[0].settled_at, Some(now));
        assert!(splits[1..].iter().all(|s| !s.is_settled && s.settled_at.is_none()));
        assert!(splits.iter().all(|s| s.transaction_id == "t1" && s.amount == dec!(30)));
    }
}
