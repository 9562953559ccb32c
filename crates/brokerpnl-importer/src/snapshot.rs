//! Account source backed by JSON exports of the broker API.

use crate::{read_json, Listing};
use anyhow::{Context, Result};
use brokerpnl_core::{
    AccountSource, CashMovement, NaiveDate, PortfolioPosition, ProductId, Timestamp, Transaction,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// File holding the account overview (`{"cashMovements": [...]}`).
pub const ACCOUNT_OVERVIEW_FILE: &str = "account_overview.json";
/// File holding the transaction history.
pub const TRANSACTIONS_FILE: &str = "transactions.json";
/// File holding the portfolio snapshot.
pub const PORTFOLIO_FILE: &str = "portfolio.json";
/// File mapping product ids to product info.
pub const PRODUCTS_FILE: &str = "products.json";

#[derive(Debug, Default, Deserialize)]
struct AccountOverview {
    #[serde(rename = "cashMovements", default)]
    cash_movements: Vec<CashMovement>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OverviewFile {
    Wrapped { data: AccountOverview },
    Bare(AccountOverview),
}

#[derive(Debug, Deserialize)]
struct ProductInfo {
    name: String,
}

/// A saved snapshot of one account.
///
/// The directory holds one file per broker endpoint: the account overview,
/// the transaction history, the portfolio and the product info of every
/// held product. List files may be bare arrays or `{"data": [...]}`
/// envelopes, as returned by the API.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
    movements: Vec<CashMovement>,
    transactions: Vec<Transaction>,
    portfolio: Vec<PortfolioPosition>,
    products: HashMap<ProductId, String>,
}

impl SnapshotSource {
    /// Load a snapshot directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            anyhow::bail!("snapshot directory not found: {}", dir.display());
        }

        let overview: OverviewFile = read_json(&dir.join(ACCOUNT_OVERVIEW_FILE))?;
        let movements = match overview {
            OverviewFile::Wrapped { data } | OverviewFile::Bare(data) => data.cash_movements,
        };
        let transactions = read_json::<Listing<Transaction>>(&dir.join(TRANSACTIONS_FILE))?
            .into_vec();
        let portfolio = read_json::<Listing<PortfolioPosition>>(&dir.join(PORTFOLIO_FILE))?
            .into_vec();

        let raw_products: BTreeMap<String, ProductInfo> = read_json(&dir.join(PRODUCTS_FILE))?;
        let products = raw_products
            .into_iter()
            .map(|(key, info)| {
                let id = key
                    .parse::<ProductId>()
                    .with_context(|| format!("invalid product id in {PRODUCTS_FILE}"))?;
                Ok((id, info.name))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        tracing::debug!(
            dir = %dir.display(),
            movements = movements.len(),
            transactions = transactions.len(),
            positions = portfolio.len(),
            products = products.len(),
            "loaded snapshot"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            movements,
            transactions,
            portfolio,
            products,
        })
    }

    /// The snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Whether `date` falls on a day in `start..=end`, taking the day in the
/// offset the broker stamped it with.
fn in_range(date: Timestamp, start: NaiveDate, end: NaiveDate) -> bool {
    (start..=end).contains(&date.date_naive())
}

impl AccountSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn cash_movements(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CashMovement>> {
        let movements: Vec<CashMovement> = self
            .movements
            .iter()
            .filter(|m| in_range(m.date, start, end))
            .cloned()
            .collect();
        tracing::debug!(
            kept = movements.len(),
            total = self.movements.len(),
            %start,
            %end,
            "filtered cash movements"
        );
        Ok(movements)
    }

    fn transactions(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        let transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.date.map_or(true, |date| in_range(date, start, end)))
            .cloned()
            .collect();
        tracing::debug!(
            kept = transactions.len(),
            total = self.transactions.len(),
            %start,
            %end,
            "filtered transactions"
        );
        Ok(transactions)
    }

    fn portfolio(&self) -> Result<Vec<PortfolioPosition>> {
        Ok(self.portfolio.clone())
    }

    fn product_name(&self, id: ProductId) -> Result<String> {
        self.products
            .get(&id)
            .cloned()
            .with_context(|| format!("no product info for {id} in {PRODUCTS_FILE}"))
    }
}
