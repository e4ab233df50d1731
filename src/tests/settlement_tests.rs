use super::{add_group_with, add_users, create_test_service};
use crate::core::errors::ExpenseError;
use crate::core::models::{SettlementRequest, SplitDetail, SplitType, Transaction, TransactionDraft};
use crate::core::services::ExpenseService;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// `debtor` owes `payer` the full `amount` of a new transaction.
async fn owe(
    service: &ExpenseService<InMemoryStorage>,
    payer: &str,
    debtor: &str,
    amount: Decimal,
    group_id: Option<&str>,
) -> Transaction {
    let mut draft = TransactionDraft::with_details(
        "Loan",
        amount,
        payer,
        SplitType::Exact,
        vec![SplitDetail::exact(debtor, amount)],
    );
    if let Some(group_id) = group_id {
        draft = draft.in_group(group_id);
    }
    service.add_transaction(draft).await.unwrap()
}

#[tokio::test]
async fn test_settle_up_end_to_end() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B", "C"]).await;
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();

    service
        .add_transaction(TransactionDraft::equal("Dinner", dec!(90), ids[0], &ids))
        .await
        .unwrap();

    let before = service.get_user_balance(ids[0]).await.unwrap();
    assert_eq!(before.total_owed, dec!(60));
    assert_eq!(before.total_owing, Decimal::ZERO);
    assert_eq!(before.net_balance, dec!(60));

    let outcome = service
        .settle_up(SettlementRequest::new(ids[1], ids[0], dec!(30)).with_note("cash"))
        .await
        .unwrap();
    assert_eq!(outcome.settled_split_ids.len(), 1);
    assert_eq!(outcome.unallocated, Decimal::ZERO);
    assert_eq!(outcome.settlement.note.as_deref(), Some("cash"));

    let after = service.get_user_balance(ids[0]).await.unwrap();
    assert_eq!(after.total_owed, dec!(30));
    assert_eq!(after.net_balance, dec!(30));
    assert_eq!(service.get_user_balance(ids[1]).await.unwrap().net_balance, Decimal::ZERO);
    assert_eq!(service.get_user_balance(ids[2]).await.unwrap().net_balance, dec!(-30));
}

#[tokio::test]
async fn test_first_fit_skips_splits_that_do_not_fit() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B"]).await;
    let (a, b) = (users[0].id.as_str(), users[1].id.as_str());

    let big = owe(&service, a, b, dec!(30), None).await;
    let small = owe(&service, a, b, dec!(20), None).await;

    let outcome = service.settle_up(SettlementRequest::new(b, a, dec!(25))).await.unwrap();

    let small_split = service.get_transaction_splits(&small.id).await.unwrap().remove(0);
    let big_split = service.get_transaction_splits(&big.id).await.unwrap().remove(0);
    assert_eq!(outcome.settled_split_ids, vec![small_split.id.clone()]);
    assert_eq!(outcome.unallocated, dec!(5));
    assert!(small_split.is_settled);
    assert!(!big_split.is_settled);
    assert_eq!(big_split.amount, dec!(30));
}

#[tokio::test]
async fn test_payment_smaller_than_every_split_settles_nothing() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B"]).await;
    let (a, b) = (users[0].id.as_str(), users[1].id.as_str());
    owe(&service, a, b, dec!(30), None).await;

    let outcome = service.settle_up(SettlementRequest::new(b, a, dec!(10))).await.unwrap();

    assert!(outcome.settled_split_ids.is_empty());
    assert_eq!(outcome.unallocated, dec!(10));
    assert_eq!(service.get_user_settlements(b).await.unwrap().len(), 1);
    assert_eq!(service.get_user_balance(b).await.unwrap().net_balance, dec!(-30));
}

#[tokio::test]
async fn test_settlement_only_touches_debts_in_its_direction() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B"]).await;
    let (a, b) = (users[0].id.as_str(), users[1].id.as_str());
    owe(&service, a, b, dec!(15), None).await;

    let outcome = service.settle_up(SettlementRequest::new(a, b, dec!(15))).await.unwrap();

    assert!(outcome.settled_split_ids.is_empty());
    assert_eq!(service.get_user_balance(b).await.unwrap().net_balance, dec!(-15));
}

#[tokio::test]
async fn test_group_settlement_is_scoped() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B"]).await;
    let (a, b) = (users[0].id.as_str(), users[1].id.as_str());
    let group = add_group_with(&service, "Trip", &[&users[0], &users[1]]).await;

    let outside = owe(&service, a, b, dec!(30), None).await;
    let inside = owe(&service, a, b, dec!(20), Some(group.id.as_str())).await;

    let outcome = service
        .settle_up(SettlementRequest::new(b, a, dec!(50)).in_group(&group.id))
        .await
        .unwrap();

    assert_eq!(outcome.unallocated, dec!(30));
    assert!(service.get_transaction_splits(&inside.id).await.unwrap()[0].is_settled);
    assert!(!service.get_transaction_splits(&outside.id).await.unwrap()[0].is_settled);
    assert_eq!(service.get_group_settlements(&group.id).await.unwrap().len(), 1);
    assert_eq!(service.get_group_balance(&group.id).await.unwrap().total_owed, Decimal::ZERO);
}

#[tokio::test]
async fn test_invalid_settlements_are_rejected() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B"]).await;
    let (a, b) = (users[0].id.as_str(), users[1].id.as_str());

    let to_self = service.settle_up(SettlementRequest::new(a, a, dec!(10))).await;
    assert!(matches!(to_self, Err(ExpenseError::SelfSettlement)));

    let unknown = service.settle_up(SettlementRequest::new(b, "ghost", dec!(10))).await;
    assert!(matches!(unknown, Err(ExpenseError::UserNotFound(id)) if id == "ghost"));

    let zero = service.settle_up(SettlementRequest::new(b, a, Decimal::ZERO)).await;
    assert!(matches!(zero, Err(ExpenseError::InvalidInput(field, _)) if field == "amount"));

    let blank_note = service.settle_up(SettlementRequest::new(b, a, dec!(5)).with_note(" ")).await;
    assert!(matches!(blank_note, Err(ExpenseError::InvalidInput(field, _)) if field == "note"));

    let no_group = service
        .settle_up(SettlementRequest::new(b, a, dec!(5)).in_group("nowhere"))
        .await;
    assert!(matches!(no_group, Err(ExpenseError::GroupNotFound(_))));

    assert!(service.list_settlements().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_settlements_include_both_sides() {
    let service = create_test_service();
    let users = add_users(&service, &["A", "B", "C"]).await;
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();

    service.settle_up(SettlementRequest::new(ids[1], ids[0], dec!(5))).await.unwrap();
    service.settle_up(SettlementRequest::new(ids[0], ids[2], dec!(7))).await.unwrap();

    let for_a = service.get_user_settlements(ids[0]).await.unwrap();
    assert_eq!(for_a.len(), 2);
    assert_eq!(service.get_user_settlements(ids[1]).await.unwrap().len(), 1);
    assert_eq!(service.get_user_settlements(ids[2]).await.unwrap()[0].amount, dec!(7));
}
