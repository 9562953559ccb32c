//! Current holdings.

use crate::id::RawId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of portfolio row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionType {
    /// A tradable instrument.
    Product,
    /// The account's cash balance.
    Cash,
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product => f.write_str("PRODUCT"),
            Self::Cash => f.write_str("CASH"),
        }
    }
}

/// One row of the portfolio snapshot: a holding or the cash balance.
///
/// # Examples
///
/// ```
/// use brokerpnl_core::{PortfolioPosition, PositionType, RawId};
///
/// let json = r#"[
///     {"id": "5", "positionType": "PRODUCT", "value": 750},
///     {"id": 0, "positionType": "CASH", "value": 200}
/// ]"#;
/// let rows: Vec<PortfolioPosition> = serde_json::from_str(json).unwrap();
/// assert_eq!(rows[0].position_type, PositionType::Product);
/// assert_eq!(rows[1].id, RawId::Int(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPosition {
    /// Row identifier; numeric for products, arbitrary for cash.
    pub id: RawId,
    /// Product or cash.
    pub position_type: PositionType,
    /// Current market value (or cash amount) in the base currency.
    pub value: Decimal,
}

impl PortfolioPosition {
    /// Create a product holding.
    pub fn product(id: impl Into<RawId>, value: Decimal) -> Self {
        Self {
            id: id.into(),
            position_type: PositionType::Product,
            value,
        }
    }

    /// Create a cash row.
    pub fn cash(id: impl Into<RawId>, value: Decimal) -> Self {
        Self {
            id: id.into(),
            position_type: PositionType::Cash,
            value,
        }
    }
}
