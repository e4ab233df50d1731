pub mod balance;
pub mod group;
pub mod settlement;
pub mod transaction;
pub mod user;

pub use balance::{GroupBalance, MemberBalance, SuggestedTransfer, UserBalance};
pub use group::{Group, GroupMember, GroupUpdate};
pub use settlement::{Settlement, SettlementOutcome, SettlementRequest};
pub use transaction::{SplitDetail, SplitType, Transaction, TransactionDraft, TransactionSplit};
pub use user::{User, UserUpdate};

/// A persisted row addressable by its id.
pub trait Entity {
    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_entity!(User, Group, GroupMember, Transaction, TransactionSplit, Settlement);
