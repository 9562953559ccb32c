//! Joining current holdings against their cost basis.

use crate::config::CashPolicy;
use crate::cost_basis::CostBasis;
use crate::ReconcileError;
use brokerpnl_core::{PortfolioPosition, PositionType, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Gain or loss of one holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionReport {
    /// The product held.
    pub product_id: ProductId,
    /// Display name from the data source.
    pub name: String,
    /// Current market value.
    pub value: Decimal,
    /// What was paid for it.
    pub cost_basis: Decimal,
    /// `value - cost_basis`.
    pub gain: Decimal,
    /// `value / cost_basis - 1`.
    pub gain_fraction: Decimal,
}

/// Outcome of reconciling the portfolio snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Holdings {
    /// One entry per product, in portfolio order.
    pub positions: Vec<PositionReport>,
    /// Sum of the product values.
    pub sum_positions: Decimal,
    /// Cash balance.
    pub cash: Decimal,
}

impl Holdings {
    /// Look up the report for a product.
    pub fn get(&self, id: ProductId) -> Option<&PositionReport> {
        self.positions.iter().find(|p| p.product_id == id)
    }
}

/// Compute the gain of every held product.
///
/// Cash rows set the cash balance (see [`CashPolicy`]); product rows are
/// matched against `basis` by canonical id and named through `resolve_name`,
/// which is called once per product row.
///
/// Fails when a product has no purchase on record, when its cost basis is
/// zero, when a product appears twice, or when two products resolve to the
/// same name.
pub fn reconcile_positions<F>(
    portfolio: &[PortfolioPosition],
    basis: &CostBasis,
    cash_policy: CashPolicy,
    mut resolve_name: F,
) -> Result<Holdings, ReconcileError>
where
    F: FnMut(ProductId) -> Result<String, ReconcileError>,
{
    let mut holdings = Holdings::default();
    let mut names: HashMap<String, ProductId> = HashMap::new();
    let mut cash_rows = 0usize;

    for row in portfolio {
        match row.position_type {
            PositionType::Cash => {
                cash_rows += 1;
                if cash_rows > 1 && cash_policy == CashPolicy::Reject {
                    return Err(ReconcileError::MultipleCashPositions { count: cash_rows });
                }
                holdings.cash = row.value;
            }
            PositionType::Product => {
                let id = ProductId::normalize(&row.id).map_err(|_| {
                    ReconcileError::InvalidProductId {
                        raw: row.id.clone(),
                        context: "portfolio",
                    }
                })?;

                if holdings.get(id).is_some() {
                    return Err(ReconcileError::DuplicatePosition { product_id: id });
                }

                let cost_basis = basis
                    .get(id)
                    .ok_or(ReconcileError::MissingCostBasis { product_id: id })?;
                if cost_basis.is_zero() {
                    return Err(ReconcileError::ZeroCostBasis { product_id: id });
                }

                let name = resolve_name(id)?;
                if let Some(&first) = names.get(&name) {
                    return Err(ReconcileError::DuplicateName {
                        name,
                        first,
                        second: id,
                    });
                }
                names.insert(name.clone(), id);

                let gain = row.value.checked_sub(cost_basis).ok_or(
                    ReconcileError::Overflow {
                        operation: "position gain",
                    },
                )?;
                let gain_fraction = row
                    .value
                    .checked_div(cost_basis)
                    .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
                    .ok_or(ReconcileError::Overflow {
                        operation: "position gain fraction",
                    })?;
                holdings.sum_positions = holdings.sum_positions.checked_add(row.value).ok_or(
                    ReconcileError::Overflow {
                        operation: "sum of positions",
                    },
                )?;

                holdings.positions.push(PositionReport {
                    product_id: id,
                    name,
                    value: row.value,
                    cost_basis,
                    gain,
                    gain_fraction,
                });
            }
        }
    }

    Ok(holdings)
}
