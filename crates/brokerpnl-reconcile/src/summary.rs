//! Account-wide totals.

use crate::cash_flow::CashFlow;
use crate::cost_basis::CostBasis;
use crate::positions::Holdings;
use crate::ReconcileError;
use brokerpnl_core::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

/// Account-wide totals derived from the three pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of all purchase costs.
    pub total_bought: Decimal,
    /// Sum of the current product values.
    pub sum_positions: Decimal,
    /// Cash balance.
    pub cash: Decimal,
    /// Sum of all deposits.
    pub total_deposited: Decimal,
    /// Number of deposits.
    pub deposit_count: usize,
    /// Earliest deposit.
    pub first_deposit: Timestamp,
    /// `sum_positions + cash`.
    pub net_worth: Decimal,
    /// `net_worth - total_deposited`.
    pub net_gain: Decimal,
    /// `net_gain / total_deposited`.
    pub net_gain_fraction: Decimal,
}

/// Combine the stage outputs into the account summary.
///
/// Fails with [`ReconcileError::ZeroDeposit`] when nothing was deposited.
pub fn derive_summary(
    cash_flow: &CashFlow,
    basis: &CostBasis,
    holdings: &Holdings,
) -> Result<Summary, ReconcileError> {
    if cash_flow.total_deposited.is_zero() {
        return Err(ReconcileError::ZeroDeposit);
    }
    // A nonzero total implies at least one deposit.
    let first_deposit = cash_flow.first_deposit.ok_or(ReconcileError::ZeroDeposit)?;

    let net_worth = holdings
        .sum_positions
        .checked_add(holdings.cash)
        .ok_or(ReconcileError::Overflow {
            operation: "net worth",
        })?;
    let net_gain = net_worth
        .checked_sub(cash_flow.total_deposited)
        .ok_or(ReconcileError::Overflow {
            operation: "net gain",
        })?;
    let net_gain_fraction = net_gain
        .checked_div(cash_flow.total_deposited)
        .ok_or(ReconcileError::Overflow {
            operation: "net gain fraction",
        })?;

    Ok(Summary {
        total_bought: basis.total_bought,
        sum_positions: holdings.sum_positions,
        cash: holdings.cash,
        total_deposited: cash_flow.total_deposited,
        deposit_count: cash_flow.deposit_count,
        first_deposit,
        net_worth,
        net_gain,
        net_gain_fraction,
    })
}
