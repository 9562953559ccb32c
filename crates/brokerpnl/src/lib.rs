//! Brokerage gain/loss CLI tools.
//!
//! This crate provides command-line tools for brokerpnl:
//!
//! - `brokerpnl-report`: Per-position gains and account return for a snapshot
//!
//! # Example Usage
//!
//! ```bash
//! brokerpnl-report snapshots/2024-06-30
//! brokerpnl-report snapshots/2024-06-30 --start 2020-01-01 --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;
