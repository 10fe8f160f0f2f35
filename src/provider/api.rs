use serde_json::{Map, Value, json};

use crate::client::{MonarchClient, mutation_error_message};
use crate::error::{Entity, ProviderError, Result};
use crate::model::{
    Account, BulkTransactionUpdate, BulkUpdateOutcome, Category, NewTransaction, Transaction,
    TransactionQuery, TransactionSplit, TransactionUpdate, TransactionsPage, round_to_cents,
};
use crate::ops;
use crate::types::TransactionId;

use super::Provider;

/// Remote-backed provider: every call is one GraphQL request against the
/// service of record. Filtering, sorting, and pagination happen server-side.
#[derive(Debug, Clone)]
pub struct ApiProvider {
    client: MonarchClient,
}

impl ApiProvider {
    pub fn new(client: MonarchClient) -> Self {
        Self { client }
    }

    fn parse<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
        serde_json::from_value(value)
            .map_err(|e| ProviderError::Api(format!("unexpected {what} response shape: {e}")))
    }

    /// Unwraps a mutation payload, surfacing service-reported field errors as
    /// a validation failure.
    fn mutation_transaction(result: &Value, action: &str) -> Result<Transaction> {
        if let Some(msg) = mutation_error_message(result) {
            return Err(ProviderError::Validation(format!("{action} failed: {msg}")));
        }
        let txn = result
            .get("transaction")
            .cloned()
            .ok_or_else(|| ProviderError::Api(format!("unexpected {action} response shape")))?;
        Self::parse(txn, action)
    }
}

impl Provider for ApiProvider {
    fn get_accounts(&self) -> Result<Vec<Account>> {
        let data = self.client.graphql("GetAccounts", ops::ACCOUNTS, json!({}))?;
        let accounts = data.get("accounts").cloned().unwrap_or_else(|| json!([]));
        Self::parse(accounts, "accounts")
    }

    fn get_categories(&self) -> Result<Vec<Category>> {
        let data = self
            .client
            .graphql("GetTransactionCategories", ops::CATEGORIES, json!({}))?;
        let categories = data.get("categories").cloned().unwrap_or_else(|| json!([]));
        Self::parse(categories, "categories")
    }

    fn get_transactions(&self, query: &TransactionQuery) -> Result<TransactionsPage> {
        let mut filters = Map::new();
        filters.insert(
            "accounts".to_string(),
            json!(query.account_ids.clone().unwrap_or_default()),
        );
        filters.insert(
            "categories".to_string(),
            json!(query.category_ids.clone().unwrap_or_default()),
        );
        if let Some(search) = &query.search {
            filters.insert("search".to_string(), json!(search));
        }
        if let Some(start) = &query.start_date {
            filters.insert("startDate".to_string(), json!(start));
        }
        if let Some(end) = &query.end_date {
            filters.insert("endDate".to_string(), json!(end));
        }

        let data = self.client.graphql(
            "GetTransactionsList",
            ops::TRANSACTIONS,
            json!({
                "limit": query.limit,
                "offset": query.offset,
                "filters": filters,
            }),
        )?;

        match data.get("allTransactions") {
            None | Some(Value::Null) => Ok(TransactionsPage::empty()),
            Some(page) => Self::parse(page.clone(), "transactions"),
        }
    }

    fn get_transaction(&self, id: &TransactionId) -> Result<Transaction> {
        let data = self.client.graphql(
            "GetTransactionDetails",
            ops::GET_TRANSACTION,
            json!({ "id": id }),
        )?;

        match data.get("getTransaction") {
            None | Some(Value::Null) => Err(ProviderError::not_found(
                Entity::Transaction,
                id.as_str(),
            )),
            Some(txn) => Self::parse(txn.clone(), "transaction"),
        }
    }

    fn update_transaction(
        &self,
        id: &TransactionId,
        update: &TransactionUpdate,
    ) -> Result<Transaction> {
        let mut input = Map::new();
        input.insert("id".to_string(), json!(id));
        if let Some(category_id) = &update.category_id {
            input.insert("category".to_string(), json!(category_id));
        }
        if let Some(name) = &update.merchant_name {
            input.insert("name".to_string(), json!(name));
        }
        if let Some(notes) = &update.notes {
            input.insert("notes".to_string(), json!(notes));
        }
        if let Some(amount) = update.amount {
            input.insert("amount".to_string(), json!(amount));
        }
        if let Some(date) = &update.date {
            input.insert("date".to_string(), json!(date));
        }
        if let Some(hide) = update.hide_from_reports {
            input.insert("hideFromReports".to_string(), json!(hide));
        }
        if let Some(needs_review) = update.needs_review {
            input.insert("needsReview".to_string(), json!(needs_review));
        }

        let data = self.client.graphql(
            "UpdateTransaction",
            ops::UPDATE_TRANSACTION,
            json!({ "input": input }),
        )?;
        let result = data
            .get("updateTransaction")
            .cloned()
            .unwrap_or_else(|| json!({}));
        Self::mutation_transaction(&result, "update")
    }

    fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        let data = self.client.graphql(
            "CreateTransaction",
            ops::CREATE_TRANSACTION,
            json!({
                "input": {
                    "date": new.date,
                    "accountId": new.account_id,
                    "amount": round_to_cents(new.amount),
                    "merchantName": new.merchant_name,
                    "categoryId": new.category_id,
                    "notes": new.notes,
                    "shouldUpdateBalance": new.update_balance,
                }
            }),
        )?;
        let result = data
            .get("createTransaction")
            .cloned()
            .unwrap_or_else(|| json!({}));
        Self::mutation_transaction(&result, "create")
    }

    fn split_transaction(
        &self,
        id: &TransactionId,
        splits: &[TransactionSplit],
    ) -> Result<Transaction> {
        let data = self.client.graphql(
            "SplitTransaction",
            ops::SPLIT_TRANSACTION,
            json!({
                "input": {
                    "transactionId": id,
                    "splitData": splits,
                }
            }),
        )?;
        let result = data
            .get("updateTransactionSplit")
            .cloned()
            .unwrap_or_else(|| json!({}));
        Self::mutation_transaction(&result, "split")
    }

    fn bulk_update_transactions(
        &self,
        ids: &[TransactionId],
        update: &BulkTransactionUpdate,
    ) -> Result<BulkUpdateOutcome> {
        let mut updates = Map::new();
        if let Some(needs_review) = update.needs_review {
            updates.insert("needsReview".to_string(), json!(needs_review));
        }
        if let Some(category_id) = &update.category_id {
            updates.insert("categoryId".to_string(), json!(category_id));
        }
        if let Some(hide) = update.hide_from_reports {
            updates.insert("hide".to_string(), json!(hide));
        }

        let data = self.client.graphql(
            "BulkUpdateTransactions",
            ops::BULK_UPDATE_TRANSACTIONS,
            json!({
                "selectedTransactionIds": ids,
                "excludedTransactionIds": [],
                "allSelected": false,
                "expectedAffectedTransactionCount": ids.len(),
                "updates": updates,
            }),
        )?;
        let result = data
            .get("bulkUpdateTransactions")
            .cloned()
            .unwrap_or_else(|| json!({}));

        if let Some(errors) = result.get("errors").and_then(|e| e.as_array())
            && !errors.is_empty()
        {
            let msg = errors
                .first()
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            return Err(ProviderError::Validation(format!(
                "bulk update failed: {msg}"
            )));
        }

        Ok(BulkUpdateOutcome {
            affected_count: result
                .get("affectedCount")
                .and_then(|c| c.as_u64())
                .unwrap_or(ids.len() as u64),
            errors: Vec::new(),
        })
    }
}
