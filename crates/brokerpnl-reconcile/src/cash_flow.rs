//! Deposit aggregation over the cash ledger.

use crate::config::ReconcileConfig;
use crate::ReconcileError;
use brokerpnl_core::{CashMovement, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;

/// Money the investor put into the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    /// Sum of all deposits.
    pub total_deposited: Decimal,
    /// Earliest deposit, if any movement was recognized as one.
    pub first_deposit: Option<Timestamp>,
    /// Number of movements recognized as deposits.
    pub deposit_count: usize,
}

/// Sum the deposits in a cash ledger.
///
/// A movement counts when its category tag and description match the
/// configured deposit tag and labels. The result does not depend on the
/// order of `movements`.
///
/// Fails with [`ReconcileError::EmptyLedger`] when `movements` is empty.
pub fn aggregate_deposits(
    movements: &[CashMovement],
    config: &ReconcileConfig,
) -> Result<CashFlow, ReconcileError> {
    if movements.is_empty() {
        return Err(ReconcileError::EmptyLedger);
    }

    let mut flow = CashFlow {
        total_deposited: Decimal::ZERO,
        first_deposit: None,
        deposit_count: 0,
    };

    for movement in movements
        .iter()
        .filter(|m| config.is_deposit(&m.kind, &m.description))
    {
        flow.total_deposited = flow
            .total_deposited
            .checked_add(movement.change)
            .ok_or(ReconcileError::Overflow {
                operation: "total deposited",
            })?;
        flow.deposit_count += 1;
        flow.first_deposit = Some(match flow.first_deposit {
            Some(first) => first.min(movement.date),
            None => movement.date,
        });
    }

    Ok(flow)
}
