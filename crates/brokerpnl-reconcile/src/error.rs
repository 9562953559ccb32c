//! Reconciliation errors.

use brokerpnl_core::{Direction, ProductId, RawId};
use thiserror::Error;

/// Errors that abort an analysis.
///
/// Every variant is fatal: a figure computed from inconsistent input would be
/// misleading, so no stage returns partial results.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The cash ledger for the requested range is empty.
    #[error("no cash movements in the requested range")]
    EmptyLedger,

    /// A transaction other than a purchase was found.
    #[error("unsupported {direction} transaction for product {product_id}: only purchases are handled")]
    UnsupportedOperation {
        /// The product traded.
        product_id: RawId,
        /// The offending direction.
        direction: Direction,
    },

    /// A held product has no recorded purchase.
    #[error("product {product_id} is held but was never bought")]
    MissingCostBasis {
        /// The held product.
        product_id: ProductId,
    },

    /// A held product has a zero cost basis.
    #[error("product {product_id} has a zero cost basis")]
    ZeroCostBasis {
        /// The held product.
        product_id: ProductId,
    },

    /// Nothing was deposited, so no return can be computed.
    #[error("total deposited is zero")]
    ZeroDeposit,

    /// An identifier could not be canonicalized.
    #[error("invalid product id {raw} in {context}")]
    InvalidProductId {
        /// The identifier as received.
        raw: RawId,
        /// Where it was found (`transaction` or `portfolio`).
        context: &'static str,
    },

    /// Two held products resolve to the same display name.
    #[error("products {first} and {second} share the name {name:?}")]
    DuplicateName {
        /// The shared name.
        name: String,
        /// The product that claimed the name first.
        first: ProductId,
        /// The product that collided with it.
        second: ProductId,
    },

    /// The same product appears twice in the portfolio.
    #[error("product {product_id} appears more than once in the portfolio")]
    DuplicatePosition {
        /// The repeated product.
        product_id: ProductId,
    },

    /// More than one cash row under the `reject` cash policy.
    #[error("portfolio has {count} cash rows")]
    MultipleCashPositions {
        /// Number of cash rows seen.
        count: usize,
    },

    /// A figure does not fit in a decimal.
    #[error("arithmetic overflow computing {operation}")]
    Overflow {
        /// The figure being computed.
        operation: &'static str,
    },

    /// The data source failed.
    #[error("failed to fetch {operation}")]
    Source {
        /// The source operation that failed.
        operation: &'static str,
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },
}

impl ReconcileError {
    pub(crate) fn fetch_failed(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Source { operation, source }
    }
}
