//! Data-access layer: one capability interface, two interchangeable backends.
//!
//! Any caller written against `Provider` must behave identically whether the
//! backing store is the remote API or a local JSON document store seeded with
//! equivalent data.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::client::{ClientMode, MonarchClient};
use crate::error::{ProviderError, Result};
use crate::model::{
    Account, BulkTransactionUpdate, BulkUpdateOutcome, Category, NewTransaction, Transaction,
    TransactionQuery, TransactionSplit, TransactionUpdate, TransactionsPage,
};
use crate::types::TransactionId;

mod api;
mod local;

pub use api::ApiProvider;
pub use local::LocalProvider;

pub trait Provider {
    fn get_accounts(&self) -> Result<Vec<Account>>;

    fn get_categories(&self) -> Result<Vec<Category>>;

    fn get_transactions(&self, query: &TransactionQuery) -> Result<TransactionsPage>;

    fn get_transaction(&self, id: &TransactionId) -> Result<Transaction>;

    /// Applies only the fields present in `update`; everything else is
    /// preserved verbatim. Returns the full updated record.
    fn update_transaction(
        &self,
        id: &TransactionId,
        update: &TransactionUpdate,
    ) -> Result<Transaction>;

    fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction>;

    /// Splits a transaction into parts. The sum-of-splits-equals-original
    /// invariant is enforced by the remote service; the local backend does not
    /// support splitting.
    fn split_transaction(
        &self,
        id: &TransactionId,
        splits: &[TransactionSplit],
    ) -> Result<Transaction>;

    fn bulk_update_transactions(
        &self,
        ids: &[TransactionId],
        update: &BulkTransactionUpdate,
    ) -> Result<BulkUpdateOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Api,
    Local,
}

/// Everything needed to construct either backend. Built by the CLI from flags
/// and environment (via clap), never read from ambient state here.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub token: Option<String>,
    pub fixtures_dir: Option<PathBuf>,
    pub local_db: Option<PathBuf>,
}

pub fn open_provider(config: ProviderConfig) -> Result<Box<dyn Provider>> {
    match config.kind {
        ProviderKind::Local => {
            let path = config.local_db.ok_or_else(|| {
                ProviderError::Config(
                    "local provider requires a database path (--local-db or MONARCH_LOCAL_DB)"
                        .to_string(),
                )
            })?;
            Ok(Box::new(LocalProvider::open(path)))
        }
        ProviderKind::Api => {
            let mode = match config.fixtures_dir {
                Some(dir) => ClientMode::Fixtures(dir),
                None => ClientMode::Http {
                    base_url: config.base_url,
                    token: config.token,
                },
            };
            Ok(Box::new(ApiProvider::new(MonarchClient::new(mode))))
        }
    }
}
