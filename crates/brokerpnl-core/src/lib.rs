//! Core types for brokerpnl
//!
//! This crate provides the records shared by every brokerpnl crate:
//!
//! - [`CashMovement`] - An entry of the account's cash ledger
//! - [`Transaction`] - An executed trade with its settlement amount
//! - [`PortfolioPosition`] - A current holding or the cash balance
//! - [`RawId`] / [`ProductId`] - Instrument identifiers as received and canonicalized
//! - [`AccountSource`] - The data source the reconciliation pipeline reads from
//!
//! # Example
//!
//! ```
//! use brokerpnl_core::{PortfolioPosition, ProductId, RawId, Transaction};
//! use rust_decimal_macros::dec;
//!
//! // The transaction history uses integer ids...
//! let txn = Transaction::buy(5, dec!(-600));
//! // ...while the portfolio snapshot uses strings.
//! let held = PortfolioPosition::product("5", dec!(750));
//!
//! assert_eq!(
//!     ProductId::normalize(&txn.product_id).unwrap(),
//!     ProductId::normalize(&held.id).unwrap(),
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod id;
pub mod movement;
pub mod position;
pub mod source;
pub mod timestamp;
pub mod transaction;

pub use id::{IdError, ProductId, RawId};
pub use movement::CashMovement;
pub use position::{PortfolioPosition, PositionType};
pub use source::AccountSource;
pub use timestamp::{parse_timestamp, Timestamp, TimestampError};
pub use transaction::{Direction, Transaction};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
