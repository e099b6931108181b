//! Retail banking ledger with exact decimal money arithmetic

#![deny(missing_docs)]

pub mod account;
pub mod amount;
pub mod errors;
pub mod ledger;
pub mod money;
pub mod script;

pub use ledger::Ledger;

/// Account identifier, a 10 digit decimal string. Unique within a [`Ledger`]
pub type AccountNumber = String;
