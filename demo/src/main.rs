//! TALLY Expense Validation: Demo CLI
//!
//! Runs the reference expense scenarios through a real validator, prints each
//! result as it would be handed to an approval workflow, checks it against
//! the published result schema, and verifies the audit trail afterwards.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- list
//!   cargo run -p demo -- scenario lodging-over-limit
//!   cargo run -p demo -- --policy policy.toml --audit-file audit_log.json run-all

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tally_audit::{InMemoryAuditSink, JsonFileAuditSink};
use tally_contracts::error::{TallyError, TallyResult};
use tally_core::{traits::AuditSink, Validator};
use tally_policy::PolicyConfig;
use tally_ref_expenses::{catalogue, find, run_scenario, Scenario};
use tally_verify::verify_result;

// ── CLI definition ────────────────────────────────────────────────────────────

/// TALLY: deterministic expense policy validation demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "TALLY expense validation reference demo",
    long_about = "Runs reference expense claims through the TALLY validator, showing\n\
                  rule findings, status precedence, schema conformance and audit integrity."
)]
struct Cli {
    /// TOML policy file to use instead of the default limits.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Append audit entries to this JSON file instead of an in-memory chain.
    #[arg(long, global = true)]
    audit_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every reference scenario in sequence.
    RunAll,
    /// List the reference scenarios.
    List,
    /// Run a single scenario by name.
    Scenario {
        /// Scenario name as shown by `list`.
        name: String,
    },
}

/// The audit backend selected on the command line.
enum Audit {
    Memory(Arc<InMemoryAuditSink>),
    File(Arc<JsonFileAuditSink>),
}

impl Audit {
    fn sink(&self) -> Box<dyn AuditSink> {
        match self {
            Audit::Memory(sink) => Box::new(sink.clone()),
            Audit::File(sink) => Box::new(sink.clone()),
        }
    }

    fn report(&self) {
        match self {
            Audit::Memory(sink) => {
                let log = sink.export_log();
                println!(
                    "Audit: {} entries in memory, chain integrity {}, terminal hash {}",
                    log.entries.len(),
                    if sink.verify_integrity() { "OK" } else { "BROKEN" },
                    if log.terminal_hash.is_empty() { "-" } else { log.terminal_hash.as_str() },
                );
            }
            Audit::File(sink) => {
                let summary = sink.summary();
                println!("Audit: {} entries in {}", summary.total, sink.path().display());
                for (agent, count) in &summary.by_agent {
                    println!("   {}: {}", agent, count);
                }
                if summary.total > 0 {
                    println!("   success rate: {}/{}", summary.successful, summary.total);
                }
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug to see every rule fire.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    match run(cli) {
        Ok(true) => println!("All selected scenarios matched their expected dispositions."),
        Ok(false) => {
            eprintln!("One or more scenarios did not match.");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> TallyResult<bool> {
    if let Command::List = cli.command {
        for scenario in catalogue() {
            println!("  {:<26} {}", scenario.name, scenario.description);
        }
        return Ok(true);
    }

    let policy = match &cli.policy {
        Some(path) => PolicyConfig::from_file(path)?,
        None => PolicyConfig::default(),
    };
    let audit = match cli.audit_file {
        Some(path) => Audit::File(Arc::new(JsonFileAuditSink::new(path))),
        None => Audit::Memory(Arc::new(InMemoryAuditSink::new("demo"))),
    };
    let validator = Validator::new(policy, audit.sink());

    let scenarios = match cli.command {
        Command::Scenario { name } => vec![find(&name).ok_or_else(|| TallyError::ConfigError {
            reason: format!("unknown scenario '{}'; run `demo list`", name),
        })?],
        _ => catalogue(),
    };

    let mut all_matched = true;
    for scenario in &scenarios {
        all_matched &= run_one(scenario, &validator)?;
    }

    audit.report();
    Ok(all_matched)
}

fn run_one(scenario: &Scenario, validator: &Validator) -> TallyResult<bool> {
    println!("── {} ──", scenario.name);
    println!("   {}", scenario.description);

    let outcome = run_scenario(scenario, validator)?;
    let value = serde_json::to_value(&outcome.result).map_err(|e| TallyError::SchemaValidation {
        reason: format!("failed to serialize result: {}", e),
    })?;
    let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    println!("{}", pretty);

    let report = verify_result(&value)?;
    println!(
        "   expected {} → got {} [{}], schema {}",
        scenario.expected_status,
        outcome.result.status,
        if outcome.matched { "match" } else { "MISMATCH" },
        if report.passed { "OK" } else { "VIOLATED" },
    );
    println!();

    Ok(outcome.matched && report.passed)
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("TALLY: Expense Policy Validation");
    println!("Reference Demo");
    println!("=================================");
    println!();
    println!("Validation pipeline per claim:");
    println!("  [1] Per-request policy overrides applied to the base limits");
    println!("  [2] Amount and category normalized; garbled input absorbed");
    println!("  [3] Eight policy rules raise issues, flags and suggested actions");
    println!("  [4] Flags resolved to one status by fixed precedence");
    println!("  [5] Result handed to the audit sink (best effort)");
    println!();
}
