//! Instrument identifiers.
//!
//! The broker hands out product identifiers in two shapes: the transaction
//! history carries native integers while the portfolio snapshot carries
//! numeric strings. [`RawId`] keeps whatever arrived on the wire and
//! [`ProductId::normalize`] is the single place where the two are folded
//! into one canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier cannot be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier is not an integer (e.g. a cash row id like `"EUR"`).
    #[error("product id {0:?} is not numeric")]
    NotNumeric(String),
}

/// An identifier as received from the data source.
///
/// # Examples
///
/// ```
/// use brokerpnl_core::RawId;
///
/// let from_portfolio: RawId = serde_json::from_str("\"123\"").unwrap();
/// let from_history: RawId = serde_json::from_str("123").unwrap();
/// assert_eq!(from_portfolio.normalize(), from_history.normalize());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Native integer representation.
    Int(i64),
    /// String representation, numeric for products.
    Text(String),
}

impl RawId {
    /// Canonicalize this identifier. Shorthand for [`ProductId::normalize`].
    pub fn normalize(&self) -> Result<ProductId, IdError> {
        ProductId::normalize(self)
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<ProductId> for RawId {
    fn from(id: ProductId) -> Self {
        Self::Int(id.0)
    }
}

/// Canonical product identifier.
///
/// Serializes as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "RawId")]
pub struct ProductId(i64);

impl ProductId {
    /// Create a product id from its integer form.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The integer form of this id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Fold either wire representation into the canonical integer form.
    ///
    /// Surrounding whitespace in string ids is ignored. Applying this to an
    /// already canonical id is a no-op.
    pub fn normalize(raw: &RawId) -> Result<Self, IdError> {
        match raw {
            RawId::Int(n) => Ok(Self(*n)),
            RawId::Text(s) => s.parse(),
        }
    }
}

impl FromStr for ProductId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| IdError::NotNumeric(s.to_string()))
    }
}

impl TryFrom<RawId> for ProductId {
    type Error = IdError;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        Self::normalize(&raw)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_string_and_int_agree() {
        let a = ProductId::normalize(&RawId::from("123")).unwrap();
        let b = ProductId::normalize(&RawId::from(123)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 123);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = ProductId::normalize(&RawId::from("  42 ")).unwrap();
        let twice = ProductId::normalize(&RawId::from(once)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_rejects_cash_ids() {
        let err = ProductId::normalize(&RawId::from("FLATEX_EUR")).unwrap_err();
        assert_eq!(err, IdError::NotNumeric("FLATEX_EUR".to_string()));
    }

    #[test]
    fn test_raw_id_deserializes_both_shapes() {
        let ids: Vec<RawId> = serde_json::from_str(r#"[5, "5", "EUR"]"#).unwrap();
        assert_eq!(ids[0], RawId::Int(5));
        assert_eq!(ids[1], RawId::Text("5".to_string()));
        assert_eq!(ids[2], RawId::Text("EUR".to_string()));
    }

    #[test]
    fn test_product_id_serde() {
        let id: ProductId = serde_json::from_str("\"331868\"").unwrap();
        assert_eq!(id, ProductId::new(331_868));
        assert_eq!(serde_json::to_string(&id).unwrap(), "331868");
    }
}
