//! # bank-ledger
//! Application replays a command script against a fresh ledger and prints the resulting
//! accounts to output.
//!
//! ## Input format
//! JSON lines, one command per line, tagged by `op`
//!
//! ```text
//! {"op": "add_account_type", "name": "savings", "rate": 10}
//! {"op": "open", "account_type": "savings", "alias": "alice"}
//! {"op": "deposit", "account": "alice", "amount": 1500}
//! {"op": "compound_interest"}
//! ```
//!
//! ## Output format
//! csv with columns `account`, `type`, `interest_rate`, `balance`

#![deny(missing_docs)]

use std::{io::IsTerminal, path::PathBuf};

use anyhow::Context;
use bank_ledger::{
    script::{self, ScriptLine, Session},
    Ledger,
};
use clap::Parser;
use tokio::{
    io::{stdout, BufReader},
    spawn,
    sync::mpsc::{channel, Sender},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Replay a ledger command script and print the account summary as csv
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// path to the JSON-lines command script
    script: PathBuf,

    /// seed for account numbers, for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the summary, logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

async fn read_script_file(path: PathBuf, sender: Sender<ScriptLine>) -> anyhow::Result<()> {
    let f = tokio::fs::File::open(&path)
        .await
        .with_context(|| format!("access script file {}", path.display()))?;

    script::read_commands(BufReader::new(f), sender)
        .await
        .context("improper content of file")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let ledger = match cli.seed {
        Some(seed) => Ledger::with_seed(seed),
        None => Ledger::new(),
    };

    // read commands from the script file
    let (tx_command, mut rx_command) = channel(8192);
    let task_read_script = spawn(read_script_file(cli.script, tx_command));

    // apply commands in script order
    let mut session = Session::new(ledger);
    while let Some((line, command)) = rx_command.recv().await {
        match session.apply(command) {
            Ok(outcome) => info!(line, %outcome, "command applied"),
            Err(e) => warn!(line, kind = ?e.kind(), error = %e, "command rejected"),
        }
    }

    task_read_script.await??;

    let summaries = script::ledger_summaries(session.ledger());
    script::summarize_accounts(tokio_stream::iter(summaries), stdout())
        .await
        .context("failed to save output")?;

    Ok(())
}
