//! Executed trades.

use crate::id::RawId;
use crate::timestamp::{self, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
///
/// The broker sends `"B"`/`"S"`; the long spellings are accepted as well.
/// Anything else is kept verbatim so the caller can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// Purchase.
    Buy,
    /// Sale.
    Sell,
    /// Unrecognized direction flag.
    Other(String),
}

impl Direction {
    /// Whether this is a purchase.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }
}

impl From<String> for Direction {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "buy" => Self::Buy,
            "s" | "sell" => Self::Sell,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Direction {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Buy => "B".to_string(),
            Direction::Sell => "S".to_string(),
            Direction::Other(s) => s,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("buy"),
            Self::Sell => f.write_str("sell"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Instrument traded.
    pub product_id: RawId,
    /// Buy or sell.
    pub buysell: Direction,
    /// Settlement amount including fees, negative when money left the account.
    pub total_plus_fee_in_base_currency: Decimal,
    /// Execution time, when the source reports it.
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<Timestamp>,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        product_id: impl Into<RawId>,
        buysell: impl Into<Direction>,
        total_plus_fee_in_base_currency: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            buysell: buysell.into(),
            total_plus_fee_in_base_currency,
            date: None,
        }
    }

    /// Create a purchase.
    pub fn buy(product_id: impl Into<RawId>, total_plus_fee_in_base_currency: Decimal) -> Self {
        Self::new(product_id, Direction::Buy, total_plus_fee_in_base_currency)
    }
}
