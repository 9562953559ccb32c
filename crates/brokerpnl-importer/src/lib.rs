//! Account sources for brokerpnl
//!
//! This crate provides [`AccountSource`](brokerpnl_core::AccountSource)
//! implementations that read broker data from disk rather than from the
//! live API.
//!
//! # Example
//!
//! ```rust,no_run
//! use brokerpnl_core::NaiveDate;
//! use brokerpnl_importer::SnapshotSource;
//! use brokerpnl_reconcile::{analyze, ReconcileConfig};
//!
//! let source = SnapshotSource::open("snapshots/2024-06-30")?;
//! let analysis = analyze(
//!     &source,
//!     &ReconcileConfig::default(),
//!     NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//! )?;
//! println!("net gain: {}", analysis.summary.net_gain);
//! # Ok::<(), anyhow::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod snapshot;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub use snapshot::SnapshotSource;

/// A list as returned by the broker: bare, or wrapped in `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// A bare JSON array.
    Bare(Vec<T>),
    /// An API response envelope.
    Wrapped {
        /// The wrapped records.
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    /// The records, whichever way they were wrapped.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
