//! Configuration for the reconciliation pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category tag the broker puts on investor-initiated cash transactions.
pub const DEFAULT_DEPOSIT_TYPE: &str = "CASH_TRANSACTION";

/// Descriptions the broker uses for a deposit.
///
/// The same deposit flow shows up under two labels depending on which side
/// of the flatex bank integration booked it.
pub const DEFAULT_DEPOSIT_LABELS: &[&str] = &["flatex Deposit", "Ingreso"];

/// What to do when the portfolio has more than one cash row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashPolicy {
    /// Keep the value of the last cash row.
    #[default]
    LastWins,
    /// Fail with [`crate::ReconcileError::MultipleCashPositions`].
    Reject,
}

/// Configuration for an analysis.
///
/// # Example
///
/// ```
/// use brokerpnl_reconcile::{CashPolicy, ReconcileConfig};
///
/// let config = ReconcileConfig::builder()
///     .deposit_label("Einzahlung")
///     .cash_policy(CashPolicy::Reject)
///     .build();
///
/// assert!(config.is_deposit("CASH_TRANSACTION", "Ingreso"));
/// assert!(config.is_deposit("CASH_TRANSACTION", "Einzahlung"));
/// assert!(!config.is_deposit("CASH_TRANSACTION", "Dividendo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Category tag a deposit must carry.
    pub deposit_type: String,
    /// Descriptions recognized as deposits.
    pub deposit_labels: BTreeSet<String>,
    /// Handling of repeated cash rows.
    pub cash_policy: CashPolicy,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            deposit_type: DEFAULT_DEPOSIT_TYPE.to_string(),
            deposit_labels: DEFAULT_DEPOSIT_LABELS
                .iter()
                .map(|label| (*label).to_string())
                .collect(),
            cash_policy: CashPolicy::default(),
        }
    }
}

impl ReconcileConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ReconcileConfigBuilder {
        ReconcileConfigBuilder::new()
    }

    /// Whether a cash movement with this tag and description is a deposit.
    pub fn is_deposit(&self, kind: &str, description: &str) -> bool {
        kind == self.deposit_type && self.deposit_labels.contains(description)
    }
}

/// Builder for [`ReconcileConfig`].
pub struct ReconcileConfigBuilder {
    config: ReconcileConfig,
}

impl ReconcileConfigBuilder {
    /// Create a new builder seeded with the defaults.
    pub fn new() -> Self {
        Self {
            config: ReconcileConfig::default(),
        }
    }

    /// Set the category tag deposits must carry.
    pub fn deposit_type(mut self, kind: impl Into<String>) -> Self {
        self.config.deposit_type = kind.into();
        self
    }

    /// Recognize another deposit label.
    pub fn deposit_label(mut self, label: impl Into<String>) -> Self {
        self.config.deposit_labels.insert(label.into());
        self
    }

    /// Replace the recognized deposit labels.
    pub fn deposit_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.deposit_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cash row policy.
    pub const fn cash_policy(mut self, policy: CashPolicy) -> Self {
        self.config.cash_policy = policy;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ReconcileConfig {
        self.config
    }
}

impl Default for ReconcileConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
