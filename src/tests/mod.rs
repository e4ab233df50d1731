mod settlement_tests;
mod user_tests;

use crate::core::models::{Group, User};
use crate::core::services::ExpenseService;
use crate::infrastructure::logging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> ExpenseService<InMemoryStorage> {
    logging::init_for_tests();
    ExpenseService::new(InMemoryStorage::new())
}

pub async fn add_users(service: &ExpenseService<InMemoryStorage>, names: &[&str]) -> Vec<User> {
    let mut users = Vec::new();
    for name in names {
        users.push(service.add_user(name, None).await.unwrap());
    }
    users
}

/// A group with every user in `members` already joined.
pub async fn add_group_with(service: &ExpenseService<InMemoryStorage>, name: &str, members: &[&User]) -> Group {
    let group = service.add_group(name, None).await.unwrap();
    for user in members {
        service.add_member_to_group(&group.id, &user.id).await.unwrap();
    }
    group
}
