//! brokerpnl-report - Per-position gains and account return of a brokerage account.
//!
//! # Usage
//!
//! ```bash
//! brokerpnl-report ./snapshot
//! brokerpnl-report ./snapshot --start 2020-01-01 --end 2020-12-31
//! brokerpnl-report ./snapshot --deposit-label Einzahlung --format json
//! ```
//!
//! The snapshot directory holds the JSON exports of the broker API (see
//! [`brokerpnl_importer::snapshot`]).

use crate::cmd::completions::ShellType;
use crate::report;
use anyhow::{Context, Result};
use brokerpnl_core::AccountSource;
use brokerpnl_importer::{read_json, SnapshotSource};
use brokerpnl_reconcile::{analyze, CashPolicy, ReconcileConfig, ReconcileError};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Report per-position gains and the account return of a broker snapshot.
#[derive(Parser, Debug)]
#[command(name = "brokerpnl-report")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    generate_completions: Option<ShellType>,

    /// Directory holding the account snapshot
    #[arg(value_name = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra cash movement description to count as a deposit (repeatable)
    #[arg(long = "deposit-label", value_name = "LABEL")]
    deposit_labels: Vec<String>,

    /// Handling of repeated cash rows in the portfolio
    #[arg(long, value_enum)]
    cash_policy: Option<CashPolicyArg>,

    /// First day of the history to consider
    #[arg(long, default_value = "2019-01-01")]
    start: NaiveDate,

    /// Last day of the history to consider (default: today)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Currency label for amounts
    #[arg(long, default_value = "EUR")]
    currency: String,

    /// Increase logging (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CashPolicyArg {
    /// Keep the last cash row
    LastWins,
    /// Fail on more than one cash row
    Reject,
}

impl From<CashPolicyArg> for CashPolicy {
    fn from(arg: CashPolicyArg) -> Self {
        match arg {
            CashPolicyArg::LastWins => Self::LastWins,
            CashPolicyArg::Reject => Self::Reject,
        }
    }
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    main_with_name("brokerpnl-report")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    if let Some(level) = log_level(args.verbose) {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(io::stderr)
            .init();
    }

    if args.data_dir.is_none() {
        eprintln!("error: DATA_DIR is required");
        eprintln!("For more information, try '--help'");
        return ExitCode::from(2);
    }

    let mut stdout = io::stdout().lock();
    match run_to(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if let Some(hint) = e.downcast_ref::<ReconcileError>().and_then(report::hint) {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(1)
        }
    }
}

/// Log level for a `-v` count; `None` defers to `RUST_LOG`.
const fn log_level(verbose: u8) -> Option<Level> {
    match verbose {
        0 => None,
        1 => Some(Level::INFO),
        _ => Some(Level::DEBUG),
    }
}

/// Build the configuration from the optional file and the flags.
fn load_config(args: &Args) -> Result<ReconcileConfig> {
    let base = match &args.config {
        Some(path) => read_json::<ReconcileConfig>(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReconcileConfig::default(),
    };

    let mut builder = ReconcileConfig::builder()
        .deposit_type(base.deposit_type)
        .deposit_labels(base.deposit_labels)
        .cash_policy(base.cash_policy);
    for label in &args.deposit_labels {
        builder = builder.deposit_label(label.clone());
    }
    if let Some(policy) = args.cash_policy {
        builder = builder.cash_policy(policy.into());
    }
    Ok(builder.build())
}

/// Analyze the snapshot named by `args` and write the report to `writer`.
pub fn run_to<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    let data_dir = args.data_dir.as_deref().context("DATA_DIR is required")?;
    let config = load_config(args)?;
    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    if end < args.start {
        anyhow::bail!("--end {end} is before --start {}", args.start);
    }

    let source = SnapshotSource::open(data_dir)?;
    tracing::info!(
        source = source.name(),
        dir = %source.dir().display(),
        start = %args.start,
        %end,
        "analyzing account"
    );

    let analysis = analyze(&source, &config, args.start, end)?;

    match args.format {
        Format::Text => report::write_text(&analysis, &args.currency, writer)?,
        Format::Json => report::write_json(&analysis, writer)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("brokerpnl-report").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["./data"]);
        assert_eq!(args.data_dir, Some(PathBuf::from("./data")));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(args.end, None);
        assert_eq!(args.format, Format::Text);
        assert_eq!(args.currency, "EUR");
        assert!(args.deposit_labels.is_empty());
        assert!(args.cash_policy.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["./data", "-v"]).verbose, 1);
        assert_eq!(parse(&["./data", "-vv"]).verbose, 2);
        assert_eq!(log_level(0), None);
        assert_eq!(log_level(1), Some(Level::INFO));
        assert_eq!(log_level(2), Some(Level::DEBUG));
        assert_eq!(log_level(5), Some(Level::DEBUG));
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "./data",
            "--deposit-label",
            "Einzahlung",
            "--deposit-label",
            "Deposit",
            "--cash-policy",
            "reject",
            "--start",
            "2020-03-01",
            "--end",
            "2020-12-31",
            "--format",
            "json",
        ]);
        assert_eq!(args.deposit_labels, vec!["Einzahlung", "Deposit"]);
        assert_eq!(args.cash_policy, Some(CashPolicyArg::Reject));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2020, 12, 31));
        assert_eq!(args.format, Format::Json);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let result = Args::try_parse_from(["brokerpnl-report", "./data", "--start", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_merges_flags() {
        let args = parse(&["./data", "--deposit-label", "Einzahlung", "--cash-policy", "reject"]);
        let config = load_config(&args).unwrap();

        assert!(config.is_deposit("CASH_TRANSACTION", "Ingreso"));
        assert!(config.is_deposit("CASH_TRANSACTION", "Einzahlung"));
        assert_eq!(config.cash_policy, CashPolicy::Reject);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"deposit_labels": ["Einzahlung"], "cash_policy": "reject"}"#,
        )
        .unwrap();

        let args = parse(&["./data", "--config", path.to_str().unwrap()]);
        let config = load_config(&args).unwrap();
        assert!(config.is_deposit("CASH_TRANSACTION", "Einzahlung"));
        assert!(!config.is_deposit("CASH_TRANSACTION", "Ingreso"));
        assert_eq!(config.cash_policy, CashPolicy::Reject);
    }

    #[test]
    fn test_end_before_start() {
        let args = parse(&["./data", "--start", "2021-01-01", "--end", "2020-01-01"]);
        let mut out = Vec::new();
        let err = run_to(&args, &mut out).unwrap_err();
        assert!(err.to_string().contains("before --start"));
    }
}
