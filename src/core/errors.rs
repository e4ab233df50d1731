use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum ExpenseError {
    /// User with given ID not found
    #[error("User {0} not found")]
    UserNotFound(String),

    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// Transaction with given ID not found
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    /// User is already a member of the group
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    /// User is not a member of the group
    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    /// Cannot create a settlement from a user to themselves
    #[error("Cannot create settlement to self")]
    SelfSettlement,

    /// Email format is invalid
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("At least one participant is required")]
    NoParticipants,

    #[error("User {0} appears more than once in the split")]
    DuplicateParticipant(String),

    /// Split values don't add up to the transaction total
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("User {0} is still referenced by transactions or settlements")]
    UserHasLedgerEntries(String),

    #[error("Group {0} is still referenced by transactions or settlements")]
    GroupHasLedgerEntries(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Sync error: {0}")]
    SyncError(String),
}

impl ExpenseError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        ExpenseError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }
}
