//! Logbook contract demo CLI.
//!
//! Every command starts a fresh in-memory ledger, commits the seed logs plus
//! any records from `--config`, then runs against it.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- get-all
//!   cargo run -p demo -- read log3
//!   cargo run -p demo -- exists log9
//!   cargo run -p demo -- --config demo.toml create --id log7 --timestamp "2024-06-01 12:00:00" \
//!       --server websv2 --user admin --event login --port 443 --ip-address 10.0.0.7

mod config;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use logbook_codec::fingerprint;
use logbook_contracts::{
    error::{LogbookError, StateError},
    record::LogRecord,
};
use logbook_core::LogContract;
use logbook_memory::{MemoryLedger, MemoryTransaction};

use crate::config::DemoConfig;

type DemoResult<T> = Result<T, Box<dyn Error>>;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Logbook: an audit-log contract over an in-memory ledger.
#[derive(Parser)]
#[command(
    name = "logbook-demo",
    about = "Run logbook contract operations against an in-memory ledger",
    long_about = "Each invocation bootstraps a fresh in-memory ledger with the seed logs,\n\
                  creates any records listed in --config, and then runs the chosen command."
)]
struct Cli {
    /// Optional TOML file with namespace, ledger settings and extra records.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through every operation, including a duplicate create and a
    /// concurrent-create race.
    RunAll,
    /// Print every stored log in key order.
    GetAll,
    /// Print the log stored under ID.
    Read { id: String },
    /// Print whether a log is stored under ID.
    Exists { id: String },
    /// Create a log and print the commit receipt.
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        timestamp: String,
        #[arg(long)]
        server: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        event: String,
        #[arg(long, allow_negative_numbers = true)]
        port: i64,
        #[arg(long)]
        ip_address: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every world-state access.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Demo error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> DemoResult<()> {
    let config = match &cli.config {
        Some(path) => DemoConfig::from_file(path)?,
        None => DemoConfig::default(),
    };
    let session = Session::start(config)?;

    match cli.command {
        Command::RunAll => run_all(&session),
        Command::GetAll => {
            let tx = session.begin()?;
            print_json(&session.contract.get_all_logs(&tx)?)
        }
        Command::Read { id } => {
            let tx = session.begin()?;
            print_json(&session.contract.read_log(&tx, &id)?)
        }
        Command::Exists { id } => {
            let tx = session.begin()?;
            println!("{}", session.contract.log_exists(&tx, &id)?);
            Ok(())
        }
        Command::Create { id, timestamp, server, user, event, port, ip_address } => {
            let record = LogRecord::new(id, timestamp, server, user, event, port, ip_address);
            let tx = session.begin()?;
            session.contract.create_log(&tx, &record)?;
            print_json(&session.commit(tx)?)
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// A bootstrapped ledger plus the namespace the contract lives in.
struct Session {
    ledger: MemoryLedger,
    namespace: String,
    contract: LogContract,
}

impl Session {
    /// Commit the seed set, then each configured record in its own transaction.
    fn start(config: DemoConfig) -> DemoResult<Self> {
        let session = Session {
            ledger: MemoryLedger::with_config(config.ledger),
            namespace: config.namespace,
            contract: LogContract::new(),
        };

        let tx = session.begin()?;
        session.contract.init_ledger(&tx)?;
        session.commit(tx)?;

        for record in &config.records {
            let tx = session.begin()?;
            session.contract.create_log(&tx, record)?;
            session.commit(tx)?;
        }

        info!(
            namespace = %session.namespace,
            extra_records = config.records.len(),
            "demo ledger ready"
        );
        Ok(session)
    }

    fn begin(&self) -> Result<MemoryTransaction, LogbookError> {
        self.ledger
            .begin(self.namespace.as_str())
            .map_err(|source| ledger_error("begin", source))
    }

    fn commit(&self, tx: MemoryTransaction) -> Result<logbook_memory::CommitReceipt, LogbookError> {
        let tx_id = tx.tx_id().to_string();
        self.ledger.commit(tx).map_err(|source| LogbookError::Store {
            operation: "commit",
            key: tx_id,
            source,
        })
    }
}

fn ledger_error(operation: &'static str, source: StateError) -> LogbookError {
    LogbookError::Store {
        operation,
        key: String::new(),
        source,
    }
}

fn print_json<T: Serialize>(value: &T) -> DemoResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Walkthrough ───────────────────────────────────────────────────────────────

fn run_all(session: &Session) -> DemoResult<()> {
    let contract = session.contract;

    println!("[1] Seed logs after bootstrap:");
    let tx = session.begin()?;
    for log in contract.get_all_logs(&tx)? {
        println!(
            "    {} {} {}@{}:{} {}",
            log.id, log.timestamp, log.user, log.server, log.port, log.event
        );
    }
    drop(tx);

    println!("[2] Create log7:");
    let log7 = LogRecord::new(
        "log7",
        "2024-06-01 12:00:00",
        "websv2",
        "admin",
        "login",
        443,
        "10.0.0.7",
    );
    let tx = session.begin()?;
    contract.create_log(&tx, &log7)?;
    let receipt = session.commit(tx)?;
    println!("    fingerprint {}", fingerprint(&log7)?);
    println!("    committed at height {} (rwset {})", receipt.block_height, receipt.rwset_digest);

    println!("[3] Create log7 again:");
    let tx = session.begin()?;
    match contract.create_log(&tx, &log7) {
        Err(e @ LogbookError::Conflict { .. }) => println!("    rejected: {}", e),
        Err(e) => return Err(e.into()),
        Ok(()) => return Err("duplicate create was accepted".into()),
    }

    println!("[4] Read missing-id:");
    match contract.read_log(&tx, "missing-id") {
        Err(e @ LogbookError::NotFound { .. }) => println!("    {}", e),
        Err(e) => return Err(e.into()),
        Ok(_) => return Err("missing-id unexpectedly exists".into()),
    }
    println!("    exists: {}", contract.log_exists(&tx, "missing-id")?);
    drop(tx);

    println!("[5] Two endorsers simulate the same create:");
    let log8 = LogRecord::new(
        "log8",
        "2024-06-02 08:15:00",
        "mailsv1",
        "guest",
        "access denied",
        25,
        "168.156.11.24",
    );
    let mut digests = Vec::new();
    for _ in 0..2 {
        let tx = session.begin()?;
        contract.create_log(&tx, &log8)?;
        let rwset = tx
            .read_write_set()
            .map_err(|source| ledger_error("read_write_set", source))?;
        digests.push(rwset.digest().map_err(|source| ledger_error("digest", source))?);
    }
    println!("    endorser A: {}", digests[0]);
    println!("    endorser B: {}", digests[1]);
    if digests[0] != digests[1] {
        return Err("endorsers disagreed on the read/write set".into());
    }

    println!("[6] Two clients race to create log9:");
    let log9 = LogRecord::new(
        "log9",
        "2024-06-03 23:59:59",
        "websv2",
        "guest",
        "port scan",
        8080,
        "203.0.113.9",
    );
    let mut rival = log9.clone();
    rival.user = "intruder".to_string();

    let first = session.begin()?;
    let second = session.begin()?;
    contract.create_log(&first, &log9)?;
    contract.create_log(&second, &rival)?;
    let winner = session.commit(first)?;
    println!("    first commit: height {}", winner.block_height);
    match session.commit(second) {
        Err(e) => println!("    second commit rolled back: {}", e),
        Ok(_) => return Err("both racing creates committed".into()),
    }

    let tx = session.begin()?;
    let stored = contract.read_log(&tx, "log9")?;
    println!("    stored log9 user: {}", stored.user);
    println!("[7] Total logs: {}", contract.get_all_logs(&tx)?.len());

    println!();
    println!("All steps completed successfully.");
    Ok(())
}
