//! Account traits and structs
use rust_decimal::Decimal;

pub(crate) mod bank_account;
pub mod number;

pub use bank_account::BankAcc;

/// Represent basic account information and balance
pub trait Account {
    /// current balance, two fractional digits
    fn balance(&self) -> Decimal;
    /// yearly interest rate in percent
    fn interest_rate(&self) -> Decimal;
    /// name of the account type this account was opened with
    fn account_type(&self) -> Option<&str>;
}

impl<T: Account + ?Sized> Account for &T {
    fn balance(&self) -> Decimal {
        (**self).balance()
    }

    fn interest_rate(&self) -> Decimal {
        (**self).interest_rate()
    }

    fn account_type(&self) -> Option<&str> {
        (**self).account_type()
    }
}
