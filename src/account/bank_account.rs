use super::Account;
use crate::{
    amount::{round_cents, Operand},
    errors::MoneyErr,
    money,
};
use rust_decimal::Decimal;

/// Balance and interest rate of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAcc {
    interest_rate: Decimal,
    balance: Decimal,
    account_type: Option<String>,
}

impl BankAcc {
    /// Create new empty [`BankAcc`] with a validated `interest_rate`
    pub fn new(interest_rate: impl Into<Operand>) -> Result<Self, MoneyErr> {
        let interest_rate = money::validate_interest_rate(&interest_rate.into())?;
        Ok(Self {
            interest_rate,
            balance: Decimal::ZERO,
            account_type: None,
        })
    }

    /// Tag the account with the type it was opened with
    pub fn with_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    #[cfg(test)]
    /// Account at `interest_rate` holding `balance`
    pub fn new_test_account(interest_rate: i64, balance: Decimal) -> Self {
        let mut a = BankAcc::new(interest_rate).unwrap();
        if balance > Decimal::ZERO {
            a.deposit(balance).unwrap();
        }
        a
    }

    /// Increase balance by `amount`, returns the new balance.
    ///
    /// On error the balance is left untouched.
    pub fn deposit(&mut self, amount: impl Into<Operand>) -> Result<Decimal, MoneyErr> {
        let new_balance = money::add_funds(&amount.into(), self.balance)?;
        Ok(self.commit(new_balance))
    }

    /// Decrease balance by `amount`, returns the new balance.
    ///
    /// On error the balance is left untouched.
    pub fn withdraw(&mut self, amount: impl Into<Operand>) -> Result<Decimal, MoneyErr> {
        let new_balance = money::compute_withdrawal(&amount.into(), self.balance)?;
        Ok(self.commit(new_balance))
    }

    /// Credit one month of interest, returns the new balance.
    ///
    /// Fails only when the result overflows a decimal.
    pub fn compound_interest(&mut self) -> Result<Decimal, MoneyErr> {
        let new_balance = money::compound_interest(self.interest_rate, self.balance)?;
        Ok(self.commit(new_balance))
    }

    fn commit(&mut self, new_balance: Decimal) -> Decimal {
        self.balance = round_cents(new_balance);
        self.balance
    }
}

impl Account for BankAcc {
    fn balance(&self) -> Decimal {
        self.balance
    }

    fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    fn account_type(&self) -> Option<&str> {
        self.account_type.as_deref()
    }
}
