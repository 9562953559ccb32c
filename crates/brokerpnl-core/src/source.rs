//! The data source the reconciliation pipeline reads from.

use crate::id::ProductId;
use crate::movement::CashMovement;
use crate::position::PortfolioPosition;
use crate::transaction::Transaction;
use anyhow::Result;
use chrono::NaiveDate;

/// Read access to one brokerage account.
///
/// Implementors fetch the raw snapshots; connectivity and authentication
/// are their concern. Date ranges are inclusive on both ends.
pub trait AccountSource {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Cash ledger entries booked between `start` and `end`.
    fn cash_movements(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CashMovement>>;

    /// Trades executed between `start` and `end`.
    fn transactions(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>>;

    /// Current holdings, cash included.
    fn portfolio(&self) -> Result<Vec<PortfolioPosition>>;

    /// Display name of a product.
    fn product_name(&self, id: ProductId) -> Result<String>;
}
