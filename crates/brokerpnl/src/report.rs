//! Rendering of an analysis for the terminal.

use brokerpnl_reconcile::{Analysis, ReconcileError};
use rust_decimal::Decimal;
use std::io::Write;

const NAME_WIDTH: usize = 45;

/// Format a fraction as a percentage with two decimals.
fn percent(fraction: Decimal) -> String {
    format!("{:.2}%", fraction * Decimal::ONE_HUNDRED)
}

/// Truncate long product names so the table stays aligned.
fn fit_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(NAME_WIDTH - 1).collect();
        short.push('\u{2026}');
        short
    }
}

/// Write the per-position table and the account summary as text.
pub fn write_text<W: Write>(
    analysis: &Analysis,
    currency: &str,
    writer: &mut W,
) -> std::io::Result<()> {
    let width = NAME_WIDTH;
    writeln!(
        writer,
        "{:<width$} | {:>12} | {:>12} | {:>9}",
        "Name", "Value", "Gain", "Gain %"
    )?;
    writeln!(writer, "{}", "-".repeat(NAME_WIDTH + 45))?;

    for position in &analysis.positions {
        writeln!(
            writer,
            "{:<width$} | {:>8.2} {currency} | {:>8.2} {currency} | {:>9}",
            fit_name(&position.name),
            position.value,
            position.gain,
            percent(position.gain_fraction),
        )?;
    }

    let summary = &analysis.summary;
    writeln!(writer)?;
    writeln!(writer, "Total bought:     {:>12.2} {currency}", summary.total_bought)?;
    writeln!(writer, "Sum of positions: {:>12.2} {currency}", summary.sum_positions)?;
    writeln!(writer, "Cash:             {:>12.2} {currency}", summary.cash)?;
    writeln!(writer, "Total deposited:  {:>12.2} {currency}", summary.total_deposited)?;
    writeln!(writer, "Deposits:         {:>12}", summary.deposit_count)?;
    writeln!(
        writer,
        "First deposit:    {}",
        summary.first_deposit.format("%Y-%m-%d %H:%M:%S %:z")
    )?;
    writeln!(writer, "Net worth:        {:>12.2} {currency}", summary.net_worth)?;
    writeln!(
        writer,
        "Net gain:         {:>12.2} {currency} ({})",
        summary.net_gain,
        percent(summary.net_gain_fraction)
    )?;

    Ok(())
}

/// Write the analysis as pretty-printed JSON.
pub fn write_json<W: Write>(analysis: &Analysis, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, analysis)?;
    writeln!(writer)?;
    Ok(())
}

/// One-line hint for the errors a user can act on.
pub fn hint(error: &ReconcileError) -> Option<&'static str> {
    match error {
        ReconcileError::UnsupportedOperation { .. } => {
            Some("sales are not supported; restrict --start/--end to a period with purchases only")
        }
        ReconcileError::MissingCostBasis { .. } => Some(
            "the purchase may predate --start, or the position was transferred in from another broker",
        ),
        ReconcileError::ZeroDeposit => {
            Some("no deposit matched; check the deposit labels with --deposit-label")
        }
        ReconcileError::EmptyLedger => Some("widen the date range with --start"),
        ReconcileError::MultipleCashPositions { .. } => {
            Some("use --cash-policy last-wins to keep the last cash row")
        }
        _ => None,
    }
}
