//! Possible errors

use crate::amount::Operand;
use rust_decimal::Decimal;
use thiserror::Error;

/// Flat classification of every failure, for callers that branch on it
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDataType,
    NegativeOrZeroAmount,
    OverdrawnFunds,
    InvalidInterestRate,
    AmountOutOfRange,
    InvalidAccountNumber,
    InvalidAccountTypeName,
    DuplicateAccountType,
    NoFreeAccountNumber,
}

/// Group errors of money arithmetic and input validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyErr {
    /// Amount was not a number
    #[error("invalid data type entry for funds: {0}. Please enter a decimal or number value")]
    InvalidDataType(Operand),
    /// Amount was zero or below
    #[error("invalid number type for funds: {0}. Please enter a positive value")]
    NegativeOrZeroAmount(Decimal),
    /// Withdrawal larger than the balance
    #[error(
        "the amount you are trying to withdraw: {requested} is over the account balance: {balance}. \
         Please enter an amount less than or equal to the account balance"
    )]
    OverdrawnFunds {
        /// requested withdrawal
        requested: Decimal,
        /// balance at the time of the request
        balance: Decimal,
    },
    /// Rate not a number or outside (0, 100]
    #[error("invalid interest rate input: {0}. The rate must be a number above 0 and at most 100")]
    InvalidInterestRate(Operand),
    /// Result does not fit into a decimal
    #[error("amount out of the representable range")]
    AmountOutOfRange,
}

impl MoneyErr {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoneyErr::InvalidDataType(_) => ErrorKind::InvalidDataType,
            MoneyErr::NegativeOrZeroAmount(_) => ErrorKind::NegativeOrZeroAmount,
            MoneyErr::OverdrawnFunds { .. } => ErrorKind::OverdrawnFunds,
            MoneyErr::InvalidInterestRate(_) => ErrorKind::InvalidInterestRate,
            MoneyErr::AmountOutOfRange => ErrorKind::AmountOutOfRange,
        }
    }
}

/// Group all errors that can occurs within ledger module
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerErr {
    #[error("the input account does not exist: {0}")]
    InvalidAccountNumber(String),
    #[error("invalid entry for account type. Please input correct value: {0}")]
    InvalidAccountTypeName(String),
    #[error("duplicate account type: {0}")]
    DuplicateAccountType(String),
    #[error("no free account number after {0} draws")]
    NoFreeAccountNumber(usize),
    #[error(transparent)]
    Money(#[from] MoneyErr),
}

impl LedgerErr {
    /// Kind of this error, looking through wrapped [`MoneyErr`]
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerErr::InvalidAccountNumber(_) => ErrorKind::InvalidAccountNumber,
            LedgerErr::InvalidAccountTypeName(_) => ErrorKind::InvalidAccountTypeName,
            LedgerErr::DuplicateAccountType(_) => ErrorKind::DuplicateAccountType,
            LedgerErr::NoFreeAccountNumber(_) => ErrorKind::NoFreeAccountNumber,
            LedgerErr::Money(e) => e.kind(),
        }
    }
}
