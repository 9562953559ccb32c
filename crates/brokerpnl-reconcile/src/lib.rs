//! Position reconciliation and gain computation for brokerage accounts.
//!
//! This crate provides the four stages of an analysis:
//! - Deposit aggregation over the cash ledger ([`aggregate_deposits`])
//! - Purchase cost aggregation per product ([`aggregate_cost_basis`])
//! - Joining holdings against their cost basis ([`reconcile_positions`])
//! - Account-wide totals ([`derive_summary`])
//!
//! [`analyze`] runs them in order against an [`AccountSource`]. Every stage
//! fails fast; there is no partial result.
//!
//! # Example
//!
//! ```
//! use brokerpnl_core::{parse_timestamp, CashMovement, PortfolioPosition, Transaction};
//! use brokerpnl_reconcile::{reconcile, ReconcileConfig};
//! use rust_decimal_macros::dec;
//!
//! let movements = [CashMovement::new(
//!     "CASH_TRANSACTION",
//!     "Ingreso",
//!     dec!(1000),
//!     parse_timestamp("2019-02-01").unwrap(),
//! )];
//! let transactions = [Transaction::buy(5, dec!(-600))];
//! let portfolio = [
//!     PortfolioPosition::product("5", dec!(750)),
//!     PortfolioPosition::cash(0, dec!(200)),
//! ];
//!
//! let analysis = reconcile(
//!     &movements,
//!     &transactions,
//!     &portfolio,
//!     &ReconcileConfig::default(),
//!     |_| Ok("AcmeCorp".to_string()),
//! )
//! .unwrap();
//!
//! assert_eq!(analysis.positions[0].gain, dec!(150));
//! assert_eq!(analysis.summary.net_gain, dec!(-50));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cash_flow;
mod config;
mod cost_basis;
mod error;
mod positions;
mod summary;

pub use cash_flow::{aggregate_deposits, CashFlow};
pub use config::{
    CashPolicy, ReconcileConfig, ReconcileConfigBuilder, DEFAULT_DEPOSIT_LABELS,
    DEFAULT_DEPOSIT_TYPE,
};
pub use cost_basis::{aggregate_cost_basis, CostBasis};
pub use error::ReconcileError;
pub use positions::{reconcile_positions, Holdings, PositionReport};
pub use summary::{derive_summary, Summary};

use brokerpnl_core::{AccountSource, CashMovement, PortfolioPosition, ProductId, Transaction};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Per-position report plus account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// One entry per held product, in portfolio order.
    pub positions: Vec<PositionReport>,
    /// Account-wide totals.
    pub summary: Summary,
}

/// Run the pipeline over already fetched records.
///
/// `resolve_name` is called once per product row.
pub fn reconcile<F>(
    movements: &[CashMovement],
    transactions: &[Transaction],
    portfolio: &[PortfolioPosition],
    config: &ReconcileConfig,
    resolve_name: F,
) -> Result<Analysis, ReconcileError>
where
    F: FnMut(ProductId) -> Result<String, ReconcileError>,
{
    let cash_flow = aggregate_deposits(movements, config)?;
    let basis = aggregate_cost_basis(transactions)?;
    let holdings = reconcile_positions(portfolio, &basis, config.cash_policy, resolve_name)?;
    let summary = derive_summary(&cash_flow, &basis, &holdings)?;

    Ok(Analysis {
        positions: holdings.positions,
        summary,
    })
}

/// Fetch the account snapshots for `start..=end` and analyze them.
///
/// Product names are looked up lazily and memoized for the duration of the
/// call.
pub fn analyze<S>(
    source: &S,
    config: &ReconcileConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Analysis, ReconcileError>
where
    S: AccountSource + ?Sized,
{
    let movements = source
        .cash_movements(start, end)
        .map_err(ReconcileError::fetch_failed("cash movements"))?;
    let transactions = source
        .transactions(start, end)
        .map_err(ReconcileError::fetch_failed("transactions"))?;
    let portfolio = source
        .portfolio()
        .map_err(ReconcileError::fetch_failed("portfolio"))?;

    let mut names: HashMap<ProductId, String> = HashMap::new();
    let resolve_name = |id: ProductId| -> Result<String, ReconcileError> {
        if let Some(name) = names.get(&id) {
            return Ok(name.clone());
        }
        let name = source
            .product_name(id)
            .map_err(ReconcileError::fetch_failed("product name"))?;
        names.insert(id, name.clone());
        Ok(name)
    };

    reconcile(&movements, &transactions, &portfolio, config, resolve_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use brokerpnl_core::{parse_timestamp, Direction};
    use rust_decimal_macros::dec;
    use std::cell::Cell;

    struct MockSource {
        movements: Vec<CashMovement>,
        transactions: Vec<Transaction>,
        portfolio: Vec<PortfolioPosition>,
        lookups: Cell<usize>,
    }

    impl MockSource {
        fn acme() -> Self {
            Self {
                movements: vec![CashMovement::new(
                    "CASH_TRANSACTION",
                    "Ingreso",
                    dec!(1000),
                    parse_timestamp("2019-02-01").unwrap(),
                )],
                transactions: vec![Transaction::buy(5, dec!(-600))],
                portfolio: vec![
                    PortfolioPosition::product("5", dec!(750)),
                    PortfolioPosition::cash(0, dec!(200)),
                ],
                lookups: Cell::new(0),
            }
        }
    }

    impl AccountSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        fn cash_movements(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<CashMovement>> {
            Ok(self.movements.clone())
        }

        fn transactions(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<Transaction>> {
            Ok(self.transactions.clone())
        }

        fn portfolio(&self) -> Result<Vec<PortfolioPosition>> {
            Ok(self.portfolio.clone())
        }

        fn product_name(&self, id: ProductId) -> Result<String> {
            self.lookups.set(self.lookups.get() + 1);
            match id.get() {
                5 => Ok("AcmeCorp".to_string()),
                other => anyhow::bail!("unknown product {other}"),
            }
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_analyze_acme_scenario() {
        let source = MockSource::acme();
        let (start, end) = range();

        let analysis = analyze(&source, &ReconcileConfig::default(), start, end).unwrap();

        assert_eq!(analysis.positions.len(), 1);
        let acme = &analysis.positions[0];
        assert_eq!(acme.name, "AcmeCorp");
        assert_eq!(acme.product_id, ProductId::new(5));
        assert_eq!(acme.value, dec!(750));
        assert_eq!(acme.gain, dec!(150));
        assert_eq!(acme.gain_fraction, dec!(0.25));

        let summary = &analysis.summary;
        assert_eq!(summary.total_bought, dec!(600));
        assert_eq!(summary.sum_positions, dec!(750));
        assert_eq!(summary.cash, dec!(200));
        assert_eq!(summary.total_deposited, dec!(1000));
        assert_eq!(summary.net_worth, dec!(950));
        assert_eq!(summary.net_gain, dec!(-50));
        assert_eq!(summary.net_gain_fraction, dec!(-0.05));
        assert_eq!(summary.first_deposit, parse_timestamp("2019-02-01").unwrap());
    }

    #[test]
    fn test_analyze_rejects_sell() {
        let mut source = MockSource::acme();
        source
            .transactions
            .push(Transaction::new(5, Direction::Sell, dec!(300)));
        let (start, end) = range();

        let result = analyze(&source, &ReconcileConfig::default(), start, end);
        assert!(matches!(
            result,
            Err(ReconcileError::UnsupportedOperation { .. })
        ));
        assert_eq!(source.lookups.get(), 0);
    }

    #[test]
    fn test_analyze_missing_cost_basis() {
        let mut source = MockSource::acme();
        source.portfolio.push(PortfolioPosition::product("6", dec!(10)));
        let (start, end) = range();

        let result = analyze(&source, &ReconcileConfig::default(), start, end);
        assert!(matches!(
            result,
            Err(ReconcileError::MissingCostBasis { .. })
        ));
    }

    #[test]
    fn test_analyze_zero_deposit() {
        let mut source = MockSource::acme();
        source.movements[0].description = "Dividendo".to_string();
        let (start, end) = range();

        let result = analyze(&source, &ReconcileConfig::default(), start, end);
        assert!(matches!(result, Err(ReconcileError::ZeroDeposit)));
    }

    #[test]
    fn test_analyze_empty_ledger() {
        let mut source = MockSource::acme();
        source.movements.clear();
        let (start, end) = range();

        let result = analyze(&source, &ReconcileConfig::default(), start, end);
        assert!(matches!(result, Err(ReconcileError::EmptyLedger)));
    }

    #[test]
    fn test_analyze_name_lookup_failure_is_fatal() {
        let mut source = MockSource::acme();
        source.transactions.push(Transaction::buy(6, dec!(-10)));
        source.portfolio.push(PortfolioPosition::product(6, dec!(12)));
        let (start, end) = range();

        let result = analyze(&source, &ReconcileConfig::default(), start, end);
        match result {
            Err(ReconcileError::Source { operation, source }) => {
                assert_eq!(operation, "product name");
                assert!(source.to_string().contains("unknown product 6"));
            }
            other => panic!("expected Source error, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_looks_up_each_product_once() {
        let source = MockSource::acme();
        let (start, end) = range();

        analyze(&source, &ReconcileConfig::default(), start, end).unwrap();
        assert_eq!(source.lookups.get(), 1);
    }
}
