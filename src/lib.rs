pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::{ExpenseError, FieldError};
pub use crate::core::models;
pub use crate::core::services::ExpenseService;
pub use infrastructure::storage::Storage;
pub use infrastructure::storage::in_memory::InMemoryStorage;
pub use infrastructure::storage::unavailable::UnavailableStorage;
pub use infrastructure::sync::{InMemorySyncQueue, QueuedStorage};

#[cfg(test)]
mod tests;
