//! Bank ledger: account types and the accounts opened from them.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    account::{
        number::{
            AccountNumberSource, RandomAccountNumbers, ACCOUNT_NUMBER_RANGE, MAX_NUMBER_DRAWS,
        },
        Account, BankAcc,
    },
    amount::{format_cents, Operand},
    errors::LedgerErr,
    money, AccountNumber,
};

/// All account types and accounts of one bank.
///
/// Accounts keep the order in which they were opened.
#[derive(Debug, Clone)]
pub struct Ledger<N = RandomAccountNumbers> {
    account_types: BTreeMap<String, Decimal>,
    accounts: Vec<(AccountNumber, BankAcc)>,
    index: HashMap<AccountNumber, usize>,
    numbers: N,
}

impl Ledger {
    /// Empty ledger drawing account numbers from system entropy
    pub fn new() -> Self {
        Self::with_number_source(RandomAccountNumbers::from_entropy())
    }

    /// Empty ledger with a reproducible account number sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_number_source(RandomAccountNumbers::seeded(seed))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: AccountNumberSource> Ledger<N> {
    /// Empty ledger drawing account numbers from `numbers`
    pub fn with_number_source(numbers: N) -> Self {
        Self {
            account_types: BTreeMap::new(),
            accounts: Vec::new(),
            index: HashMap::new(),
            numbers,
        }
    }

    /// Register account type `name` with yearly `interest_rate` in percent
    pub fn add_account_type(
        &mut self,
        name: &str,
        interest_rate: impl Into<Operand>,
    ) -> Result<(), LedgerErr> {
        if name.is_empty() {
            return Err(LedgerErr::InvalidAccountTypeName(name.to_owned()));
        }
        if self.account_types.contains_key(name) {
            return Err(LedgerErr::DuplicateAccountType(name.to_owned()));
        }
        let rate = money::validate_interest_rate(&interest_rate.into())?;

        debug!(account_type = name, %rate, "account type registered");
        self.account_types.insert(name.to_owned(), rate);
        Ok(())
    }

    /// Open an empty account of a registered type and return its number
    pub fn open_account(&mut self, type_name: &str) -> Result<AccountNumber, LedgerErr> {
        let rate = *self
            .account_types
            .get(type_name)
            .ok_or_else(|| LedgerErr::InvalidAccountTypeName(type_name.to_owned()))?;

        let account = BankAcc::new(rate)?.with_type(type_name);
        let number = self.fresh_number()?;

        debug!(account = %number, account_type = type_name, "account opened");
        self.index.insert(number.clone(), self.accounts.len());
        self.accounts.push((number.clone(), account));
        Ok(number)
    }

    /// Deposit `amount` into account `number`
    pub fn deposit(&mut self, number: &str, amount: impl Into<Operand>) -> Result<(), LedgerErr> {
        let account = self.account_mut(number)?;
        let balance = account.deposit(amount)?;

        debug!(account = number, %balance, "deposit");
        Ok(())
    }

    /// Withdraw `amount` from account `number`
    pub fn withdraw(&mut self, number: &str, amount: impl Into<Operand>) -> Result<(), LedgerErr> {
        let account = self.account_mut(number)?;
        let balance = account.withdraw(amount)?;

        debug!(account = number, %balance, "withdrawal");
        Ok(())
    }

    /// Move `amount` from account `from` to account `to`.
    ///
    /// Both balances are computed before either is stored, so a failure
    /// leaves both accounts untouched.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: impl Into<Operand>,
    ) -> Result<(), LedgerErr> {
        let from_pos = self.position(from)?;
        let to_pos = self.position(to)?;
        let amount = amount.into();

        let mut debited = self.accounts[from_pos].1.clone();
        debited.withdraw(amount.clone())?;

        if from_pos == to_pos {
            debited.deposit(amount)?;
            self.accounts[from_pos].1 = debited;
        } else {
            let mut credited = self.accounts[to_pos].1.clone();
            credited.deposit(amount)?;
            self.accounts[from_pos].1 = debited;
            self.accounts[to_pos].1 = credited;
        }

        debug!(from, to, "transfer");
        Ok(())
    }

    /// Credit one month of interest to every account, in opening order.
    ///
    /// Nothing is stored unless every account compounds successfully.
    pub fn compound_all_accounts(&mut self) -> Result<(), LedgerErr> {
        let mut staged = Vec::with_capacity(self.accounts.len());
        for (_, account) in &self.accounts {
            let mut account = account.clone();
            account.compound_interest()?;
            staged.push(account);
        }

        for ((_, account), compounded) in self.accounts.iter_mut().zip(staged) {
            *account = compounded;
        }

        debug!(accounts = self.accounts.len(), "interest compounded");
        Ok(())
    }

    /// Balance of account `number` with two fractional digits
    pub fn balance(&self, number: &str) -> Result<String, LedgerErr> {
        let account = self.account_ref(number)?;
        Ok(format_cents(account.balance()))
    }

    /// Interest rate of the type account `number` was opened with, two fractional digits
    pub fn interest_rate(&self, number: &str) -> Result<String, LedgerErr> {
        let account = self.account_ref(number)?;
        let rate = account
            .account_type()
            .and_then(|name| self.account_types.get(name).copied())
            .unwrap_or_else(|| account.interest_rate());
        Ok(format_cents(rate))
    }

    /// Account stored under `number`
    pub fn account(&self, number: &str) -> Option<&BankAcc> {
        self.index.get(number).map(|&pos| &self.accounts[pos].1)
    }

    /// All accounts in opening order
    pub fn accounts(&self) -> impl Iterator<Item = (&str, &BankAcc)> + '_ {
        self.accounts
            .iter()
            .map(|(number, account)| (number.as_str(), account))
    }

    /// Registered account types with their rates, by name
    pub fn account_types(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.account_types
            .iter()
            .map(|(name, rate)| (name.as_str(), *rate))
    }

    /// Number of opened accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// `true` when no account was opened yet
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn fresh_number(&mut self) -> Result<AccountNumber, LedgerErr> {
        for _ in 0..MAX_NUMBER_DRAWS {
            let drawn = self.numbers.next_number();
            if !ACCOUNT_NUMBER_RANGE.contains(&drawn) {
                warn!(account = drawn, "account number out of range, drawing again");
                continue;
            }

            let candidate = drawn.to_string();
            if !self.index.contains_key(&candidate) {
                return Ok(candidate);
            }
            debug!(account = %candidate, "account number taken, drawing again");
        }

        Err(LedgerErr::NoFreeAccountNumber(MAX_NUMBER_DRAWS))
    }

    fn position(&self, number: &str) -> Result<usize, LedgerErr> {
        self.index
            .get(number)
            .copied()
            .ok_or_else(|| LedgerErr::InvalidAccountNumber(number.to_owned()))
    }

    fn account_ref(&self, number: &str) -> Result<&BankAcc, LedgerErr> {
        let pos = self.position(number)?;
        Ok(&self.accounts[pos].1)
    }

    fn account_mut(&mut self, number: &str) -> Result<&mut BankAcc, LedgerErr> {
        let pos = self.position(number)?;
        Ok(&mut self.accounts[pos].1)
    }
}
