//! Purchase cost aggregation over the transaction history.

use crate::ReconcileError;
use brokerpnl_core::{ProductId, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// What was paid for each instrument, fees included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CostBasis {
    /// Accumulated purchase cost per product.
    pub by_product: BTreeMap<ProductId, Decimal>,
    /// Sum of all purchase costs.
    pub total_bought: Decimal,
}

impl CostBasis {
    /// Cost basis of one product.
    pub fn get(&self, id: ProductId) -> Option<Decimal> {
        self.by_product.get(&id).copied()
    }
}

/// Accumulate purchase costs per product.
///
/// Each purchase contributes `-totalPlusFeeInBaseCurrency` (the settlement
/// amount is negative when money leaves the account). Sales are not
/// handled: any non-buy transaction fails the whole call with
/// [`ReconcileError::UnsupportedOperation`].
///
/// ```
/// use brokerpnl_core::{ProductId, Transaction};
/// use brokerpnl_reconcile::aggregate_cost_basis;
/// use rust_decimal_macros::dec;
///
/// let history = [
///     Transaction::buy(5, dec!(-600)),
///     Transaction::buy("5", dec!(-150.25)),
///     Transaction::buy(9, dec!(-40)),
/// ];
/// let basis = aggregate_cost_basis(&history).unwrap();
/// assert_eq!(basis.get(ProductId::new(5)), Some(dec!(750.25)));
/// assert_eq!(basis.total_bought, dec!(790.25));
/// ```
pub fn aggregate_cost_basis(transactions: &[Transaction]) -> Result<CostBasis, ReconcileError> {
    let mut basis = CostBasis::default();

    for txn in transactions {
        if !txn.buysell.is_buy() {
            return Err(ReconcileError::UnsupportedOperation {
                product_id: txn.product_id.clone(),
                direction: txn.buysell.clone(),
            });
        }

        let id = ProductId::normalize(&txn.product_id).map_err(|_| {
            ReconcileError::InvalidProductId {
                raw: txn.product_id.clone(),
                context: "transaction",
            }
        })?;

        let cost = -txn.total_plus_fee_in_base_currency;
        let entry = basis.by_product.entry(id).or_default();
        *entry = entry.checked_add(cost).ok_or(ReconcileError::Overflow {
            operation: "cost basis",
        })?;
        basis.total_bought = basis
            .total_bought
            .checked_add(cost)
            .ok_or(ReconcileError::Overflow {
                operation: "total bought",
            })?;
    }

    Ok(basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerpnl_core::{Direction, RawId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_repeated_purchases_accumulate() {
        let history = vec![
            Transaction::buy(331_868, dec!(-1003.85)),
            Transaction::buy(331_868, dec!(-502.10)),
            Transaction::buy(1_157_688, dec!(-250.50)),
        ];

        let basis = aggregate_cost_basis(&history).unwrap();
        assert_eq!(basis.by_product.len(), 2);
        assert_eq!(basis.get(ProductId::new(331_868)), Some(dec!(1505.95)));
        assert_eq!(basis.get(ProductId::new(1_157_688)), Some(dec!(250.50)));
        assert_eq!(basis.total_bought, dec!(1756.45));
    }

    #[test]
    fn test_string_and_int_ids_share_an_entry() {
        let history = vec![Transaction::buy("42", dec!(-10)), Transaction::buy(42, dec!(-5))];

        let basis = aggregate_cost_basis(&history).unwrap();
        assert_eq!(basis.by_product.len(), 1);
        assert_eq!(basis.get(ProductId::new(42)), Some(dec!(15)));
    }

    #[test]
    fn test_sell_anywhere_fails() {
        let history = vec![
            Transaction::buy(1, dec!(-100)),
            Transaction::new(1, Direction::Sell, dec!(120)),
            Transaction::buy(2, dec!(-100)),
        ];

        let result = aggregate_cost_basis(&history);
        assert!(matches!(
            result,
            Err(ReconcileError::UnsupportedOperation {
                direction: Direction::Sell,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_direction_fails() {
        let history = vec![Transaction::new(7, "X", dec!(-1))];

        let result = aggregate_cost_basis(&history);
        assert!(matches!(
            result,
            Err(ReconcileError::UnsupportedOperation { product_id: RawId::Int(7), .. })
        ));
    }

    #[test]
    fn test_non_numeric_id() {
        let history = vec![Transaction::buy("ABC", dec!(-1))];

        let result = aggregate_cost_basis(&history);
        assert!(matches!(
            result,
            Err(ReconcileError::InvalidProductId {
                context: "transaction",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_history() {
        let basis = aggregate_cost_basis(&[]).unwrap();
        assert!(basis.by_product.is_empty());
        assert_eq!(basis.total_bought, Decimal::ZERO);
    }

    #[test]
    fn test_cost_overflow() {
        let history = vec![
            Transaction::buy(1, Decimal::MIN),
            Transaction::buy(1, Decimal::MIN),
        ];
        let result = aggregate_cost_basis(&history);
        assert!(matches!(
            result,
            Err(ReconcileError::Overflow {
                operation: "cost basis"
            })
        ));
    }
}
