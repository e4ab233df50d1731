use super::{add_group_with, add_users, create_test_service};
use crate::core::errors::ExpenseError;
use crate::core::models::{TransactionDraft, UserUpdate};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_add_and_get_user() {
    let service = create_test_service();
    let user = service.add_user("  Alice ", Some("alice@example.com")).await.unwrap();

    assert_eq!(user.name, "Alice");
    let stored = service.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(stored, user);
    assert_eq!(service.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_user_rejects_bad_input() {
    let service = create_test_service();

    let result = service.add_user("", None).await;
    assert!(matches!(result, Err(ExpenseError::InvalidInput(field, _)) if field == "name"));

    let result = service.add_user("Bob", Some("bob")).await;
    assert!(matches!(result, Err(ExpenseError::InvalidEmail(_))));

    assert!(service.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_user() {
    let service = create_test_service();
    let user = service.add_user("Alice", Some("alice@example.com")).await.unwrap();

    let updated = service
        .update_user(
            &user.id,
            UserUpdate {
                name: Some("Alicia".to_string()),
                email: Some(None),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, user.id);
    assert_eq!(updated.name, "Alicia");
    assert!(updated.email.is_none());
    assert_eq!(updated.created_at, user.created_at);

    let missing = service.update_user("nope", UserUpdate::default()).await;
    assert!(matches!(missing, Err(ExpenseError::UserNotFound(id)) if id == "nope"));
}

#[tokio::test]
async fn test_delete_user_drops_memberships() {
    let service = create_test_service();
    let users = add_users(&service, &["Alice", "Bob"]).await;
    let group = add_group_with(&service, "Flat", &[&users[0], &users[1]]).await;

    service.delete_user(&users[1].id).await.unwrap();

    assert!(service.get_user(&users[1].id).await.unwrap().is_none());
    let members = service.get_group_members(&group.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, users[0].id);
}

#[tokio::test]
async fn test_delete_user_with_ledger_entries_is_refused() {
    let service = create_test_service();
    let users = add_users(&service, &["Alice", "Bob"]).await;
    service
        .add_transaction(TransactionDraft::equal("Lunch", dec!(20), &users[0].id, &[users[0].id.as_str(), users[1].id.as_str()]))
        .await
        .unwrap();

    let result = service.delete_user(&users[1].id).await;
    assert!(matches!(result, Err(ExpenseError::UserHasLedgerEntries(_))));
    assert!(service.get_user(&users[1].id).await.unwrap().is_some());
}
