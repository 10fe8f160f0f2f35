use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Entity, ProviderError, Result};
use crate::filter;
use crate::model::{
    Account, AccountRef, BulkTransactionUpdate, BulkUpdateOutcome, Category, CategoryRef,
    MerchantRef, NewTransaction, Transaction, TransactionQuery, TransactionSplit,
    TransactionUpdate, TransactionsPage, round_to_cents,
};
use crate::types::TransactionId;

use super::Provider;

/// On-disk document store: three named collections keyed by the entities'
/// natural identifiers, in the same wire field form the remote API returns.
#[derive(Debug, Default, Deserialize, Serialize)]
struct Store {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// Local-store-backed provider. Holds no state across calls: every operation
/// re-reads the store and mutating operations rewrite it. Concurrent writers
/// against one store file are not coordinated.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    path: PathBuf,
}

impl LocalProvider {
    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<Store> {
        let s = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::Config(format!(
                "cannot open local database {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(serde_json::from_str(&s)?)
    }

    fn save(&self, store: &Store) -> Result<()> {
        let s = serde_json::to_string_pretty(store)?;
        fs::write(&self.path, s)?;
        Ok(())
    }
}

/// Mimics the vendor's numeric id format: an 18-digit opaque string.
fn generate_transaction_id() -> TransactionId {
    let digits = format!("{:039}", Uuid::new_v4().as_u128());
    TransactionId::new(digits[..18].to_string())
}

impl Provider for LocalProvider {
    fn get_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.load()?.accounts)
    }

    fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(self.load()?.categories)
    }

    fn get_transactions(&self, query: &TransactionQuery) -> Result<TransactionsPage> {
        let store = self.load()?;
        Ok(filter::run_query(store.transactions, query))
    }

    fn get_transaction(&self, id: &TransactionId) -> Result<Transaction> {
        let store = self.load()?;
        store
            .transactions
            .into_iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| ProviderError::not_found(Entity::Transaction, id.as_str()))
    }

    fn update_transaction(
        &self,
        id: &TransactionId,
        update: &TransactionUpdate,
    ) -> Result<Transaction> {
        let mut store = self.load()?;

        // Validate the category reference before touching the transaction.
        let category_snapshot = match &update.category_id {
            None => None,
            Some(category_id) => {
                let cat = store
                    .categories
                    .iter()
                    .find(|c| &c.id == category_id)
                    .ok_or_else(|| {
                        ProviderError::not_found(Entity::Category, category_id.as_str())
                    })?;
                Some(CategoryRef {
                    id: cat.id.clone(),
                    name: cat.name.clone(),
                })
            }
        };

        let txn = store
            .transactions
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| ProviderError::not_found(Entity::Transaction, id.as_str()))?;

        if let Some(snapshot) = category_snapshot {
            txn.category = snapshot;
        }
        if let Some(name) = &update.merchant_name {
            // Only the display name changes; the merchant id is preserved.
            txn.merchant.name = name.clone();
        }
        if let Some(notes) = &update.notes {
            txn.notes = Some(notes.clone());
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(date) = &update.date {
            txn.date = date.clone();
        }
        if let Some(hide) = update.hide_from_reports {
            txn.hide_from_reports = hide;
        }
        if let Some(needs_review) = update.needs_review {
            txn.needs_review = needs_review;
        }

        let updated = txn.clone();
        self.save(&store)?;
        Ok(updated)
    }

    fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        let mut store = self.load()?;

        let account = store
            .accounts
            .iter()
            .find(|a| a.id == new.account_id)
            .ok_or_else(|| ProviderError::not_found(Entity::Account, new.account_id.as_str()))?;
        let category = store
            .categories
            .iter()
            .find(|c| c.id == new.category_id)
            .ok_or_else(|| ProviderError::not_found(Entity::Category, new.category_id.as_str()))?;

        let amount = round_to_cents(new.amount);
        let txn = Transaction {
            id: generate_transaction_id(),
            amount,
            date: new.date.clone(),
            pending: false,
            hide_from_reports: false,
            needs_review: false,
            plaid_name: Some(String::new()),
            notes: Some(new.notes.clone()),
            is_recurring: false,
            review_status: None,
            is_split_transaction: false,
            account: AccountRef {
                id: account.id.clone(),
                display_name: account.display_name.clone(),
            },
            merchant: MerchantRef {
                id: format!("merch_{}", Uuid::new_v4().simple()).into(),
                name: new.merchant_name.clone(),
                transactions_count: None,
            },
            category: CategoryRef {
                id: category.id.clone(),
                name: category.name.clone(),
            },
            tags: Vec::new(),
        };

        if new.update_balance {
            let account_id = account.id.clone();
            if let Some(account) = store.accounts.iter_mut().find(|a| a.id == account_id) {
                account.current_balance = Some(
                    round_to_cents(account.current_balance.unwrap_or(0.0) + amount),
                );
            }
        }

        store.transactions.push(txn.clone());
        self.save(&store)?;
        Ok(txn)
    }

    fn split_transaction(
        &self,
        _id: &TransactionId,
        _splits: &[TransactionSplit],
    ) -> Result<Transaction> {
        // Split validation (sum of parts equals the original amount) lives in
        // the remote service; the local store has no equivalent.
        Err(ProviderError::Unsupported(
            "split_transaction is only available with the api provider",
        ))
    }

    fn bulk_update_transactions(
        &self,
        ids: &[TransactionId],
        update: &BulkTransactionUpdate,
    ) -> Result<BulkUpdateOutcome> {
        let per_item = TransactionUpdate {
            category_id: update.category_id.clone(),
            needs_review: update.needs_review,
            hide_from_reports: update.hide_from_reports,
            ..TransactionUpdate::default()
        };

        let mut affected_count = 0;
        let mut errors = Vec::new();
        for id in ids {
            match self.update_transaction(id, &per_item) {
                Ok(_) => affected_count += 1,
                Err(e) => errors.push(format!("{id}: {e}")),
            }
        }

        Ok(BulkUpdateOutcome {
            affected_count,
            errors,
        })
    }
}
