use expensable::config::CONFIG;
use expensable::infrastructure::logging;
use expensable::infrastructure::sync::{self, InMemorySyncQueue, QueuedStorage};
use expensable::models::{SettlementRequest, TransactionDraft};
use expensable::{ExpenseService, InMemoryStorage};
use rust_decimal::Decimal;
use tracing::info;

// Walks through a small shared-expense session against an in-memory ledger and
// prints the resulting balances as JSON.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&CONFIG);

    let storage = QueuedStorage::new(InMemoryStorage::new(), InMemorySyncQueue::new());
    let service = ExpenseService::with_limits(storage, CONFIG.limits());

    let alice = service.add_user("Alice", Some("alice@example.com")).await?;
    let bob = service.add_user("Bob", None).await?;
    let carol = service.add_user("Carol", None).await?;

    let trip = service.add_group("Weekend trip", Some("Cabin rental and food")).await?;
    for user in [&alice, &bob, &carol] {
        service.add_member_to_group(&trip.id, &user.id).await?;
    }

    let draft = TransactionDraft::equal(
        "Groceries",
        Decimal::new(9000, 2),
        &alice.id,
        &[alice.id.as_str(), bob.id.as_str(), carol.id.as_str()],
    )
    .in_group(&trip.id);
    service.add_transaction(draft).await?;

    let outcome = service
        .settle_up(SettlementRequest::new(&bob.id, &alice.id, Decimal::new(3000, 2)).in_group(&trip.id))
        .await?;
    info!(settled = outcome.settled_split_ids.len(), "settled up");

    println!("{}", serde_json::to_string_pretty(&service.get_all_balances().await?)?);
    println!("{}", serde_json::to_string_pretty(&service.get_group_balance(&trip.id).await?)?);
    println!("{}", serde_json::to_string_pretty(&service.suggest_group_transfers(&trip.id).await?)?);

    let remote = InMemoryStorage::new();
    let applied = sync::replay(service.storage().queue(), &remote).await?;
    let status = sync::status(service.storage().queue()).await?;
    info!(applied, pending = status.pending_operations, "replicated local writes");

    Ok(())
}
