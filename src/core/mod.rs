pub mod balance;
pub mod errors;
pub mod models;
pub mod money;
pub mod services;
pub mod settlement;
pub mod split;
pub mod validation;
