//! Cash ledger entries.

use crate::timestamp::{self, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the account's cash ledger.
///
/// Field names follow the broker's `cashMovements` payload.
///
/// # Examples
///
/// ```
/// use brokerpnl_core::CashMovement;
///
/// let json = r#"{
///     "type": "CASH_TRANSACTION",
///     "description": "Ingreso",
///     "change": 1000,
///     "date": "2019-02-01T10:00:00+0100"
/// }"#;
/// let movement: CashMovement = serde_json::from_str(json).unwrap();
/// assert_eq!(movement.kind, "CASH_TRANSACTION");
/// assert_eq!(movement.change, 1000.into());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashMovement {
    /// Category tag (e.g. `CASH_TRANSACTION`, `FLATEX_CASH_SWEEP`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-text subtype, e.g. the deposit label.
    #[serde(default)]
    pub description: String,
    /// Signed amount in the base currency.
    pub change: Decimal,
    /// When the movement was booked.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date: Timestamp,
}

impl CashMovement {
    /// Create a new cash movement.
    pub fn new(
        kind: impl Into<String>,
        description: impl Into<String>,
        change: Decimal,
        date: Timestamp,
    ) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            change,
            date,
        }
    }
}
