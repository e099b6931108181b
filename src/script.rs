//! Command script input and csv account summary output

use std::{collections::HashMap, fmt};

use csv_async::AsyncWriterBuilder;
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite},
    sync::mpsc::Sender,
};
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::{
    account::{
        number::{AccountNumberSource, RandomAccountNumbers},
        Account,
    },
    amount::{format_cents, Operand},
    errors::LedgerErr,
    AccountNumber, Ledger,
};

/// One line of a command script, tagged by `op`.
///
/// `account`, `from` and `to` take an alias given to `open` or a literal
/// account number.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Command {
    AddAccountType {
        name: String,
        #[serde(default)]
        rate: Operand,
    },
    Open {
        account_type: String,
        #[serde(default)]
        alias: Option<String>,
    },
    Deposit {
        account: String,
        #[serde(default)]
        amount: Operand,
    },
    Withdraw {
        account: String,
        #[serde(default)]
        amount: Operand,
    },
    Transfer {
        from: String,
        to: String,
        #[serde(default)]
        amount: Operand,
    },
    CompoundInterest,
    Balance {
        account: String,
    },
    InterestRate {
        account: String,
    },
}

/// Command together with its 1-based line number in the script
pub type ScriptLine = (usize, Command);

/// Read a JSON-lines script from `input` and send each command to `sender`.
///
/// Blank lines and lines starting with `#` are ignored. Lines that are not a
/// valid command are logged and skipped.
pub async fn read_commands<R: AsyncBufRead + Unpin>(
    input: R,
    sender: Sender<ScriptLine>,
) -> anyhow::Result<()> {
    let mut lines = input.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<Command>(line) {
            Ok(command) => sender.send((line_no, command)).await?,
            Err(e) => warn!(line = line_no, error = %e, "skipping malformed command"),
        }
    }

    Ok(())
}

/// Result of a successfully applied [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// state changed, nothing to report
    Done,
    /// account opened under this number
    Opened(AccountNumber),
    /// formatted balance
    Balance(String),
    /// formatted interest rate
    InterestRate(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => f.write_str("ok"),
            Outcome::Opened(number) => write!(f, "opened {number}"),
            Outcome::Balance(balance) => write!(f, "balance {balance}"),
            Outcome::InterestRate(rate) => write!(f, "interest rate {rate}"),
        }
    }
}

/// Ledger plus the account aliases declared by a script
#[derive(Debug)]
pub struct Session<N = RandomAccountNumbers> {
    ledger: Ledger<N>,
    aliases: HashMap<String, AccountNumber>,
}

impl<N: AccountNumberSource> Session<N> {
    /// Start a session on `ledger`
    pub fn new(ledger: Ledger<N>) -> Self {
        Self {
            ledger,
            aliases: HashMap::new(),
        }
    }

    /// Ledger in its current state
    pub fn ledger(&self) -> &Ledger<N> {
        &self.ledger
    }

    /// Apply one command. A rejected command leaves the ledger untouched
    pub fn apply(&mut self, command: Command) -> Result<Outcome, LedgerErr> {
        let aliases = &self.aliases;
        let ledger = &mut self.ledger;

        match command {
            Command::AddAccountType { name, rate } => {
                ledger.add_account_type(&name, rate)?;
                Ok(Outcome::Done)
            }
            Command::Open {
                account_type,
                alias,
            } => {
                let number = ledger.open_account(&account_type)?;
                if let Some(alias) = alias {
                    self.aliases.insert(alias, number.clone());
                }
                Ok(Outcome::Opened(number))
            }
            Command::Deposit { account, amount } => {
                ledger.deposit(resolve(aliases, &account), amount)?;
                Ok(Outcome::Done)
            }
            Command::Withdraw { account, amount } => {
                ledger.withdraw(resolve(aliases, &account), amount)?;
                Ok(Outcome::Done)
            }
            Command::Transfer { from, to, amount } => {
                ledger.transfer(resolve(aliases, &from), resolve(aliases, &to), amount)?;
                Ok(Outcome::Done)
            }
            Command::CompoundInterest => {
                ledger.compound_all_accounts()?;
                Ok(Outcome::Done)
            }
            Command::Balance { account } => {
                let balance = ledger.balance(resolve(aliases, &account))?;
                Ok(Outcome::Balance(balance))
            }
            Command::InterestRate { account } => {
                let rate = ledger.interest_rate(resolve(aliases, &account))?;
                Ok(Outcome::InterestRate(rate))
            }
        }
    }
}

fn resolve<'a>(aliases: &'a HashMap<String, AccountNumber>, name: &'a str) -> &'a str {
    aliases.get(name).map(String::as_str).unwrap_or(name)
}

/// summary of one account, rates and balances with two fractional digits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct AccountSummary {
    pub account: AccountNumber,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub interest_rate: String,
    pub balance: String,
}

impl AccountSummary {
    /// Summary of `account` stored under `number`
    pub fn new(number: &str, account: impl Account) -> Self {
        Self {
            account: number.to_owned(),
            account_type: account.account_type().map(str::to_owned),
            interest_rate: format_cents(account.interest_rate()),
            balance: format_cents(account.balance()),
        }
    }
}

/// Summaries of every account of `ledger`, in opening order
pub fn ledger_summaries<N: AccountNumberSource>(ledger: &Ledger<N>) -> Vec<AccountSummary> {
    ledger
        .accounts()
        .map(|(number, account)| AccountSummary::new(number, account))
        .collect()
}

/// read items from `in_stream` and save them as csv into `wr`. Headers will be
/// included automatically.
pub async fn summarize_accounts(
    in_stream: impl Stream<Item = AccountSummary> + Unpin,
    wr: impl AsyncWrite + Unpin,
) -> anyhow::Result<()> {
    let mut in_stream = in_stream;

    let mut wr = AsyncWriterBuilder::new().create_serializer(wr);

    while let Some(acc_summary) = in_stream.next().await {
        wr.serialize(acc_summary).await?;
    }

    wr.flush().await?;
    Ok(())
}
