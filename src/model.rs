use serde::{Deserialize, Serialize};

use crate::types::{AccountId, CategoryGroupType, CategoryId, MerchantId, TagId, TransactionId};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountType {
    pub name: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Institution {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credential {
    #[serde(rename = "updateRequired", default)]
    pub update_required: Option<bool>,
    #[serde(rename = "disconnectedFromDataProviderAt", default)]
    pub disconnected_from_data_provider_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub subtype: Option<AccountType>,
    #[serde(rename = "currentBalance", default)]
    pub current_balance: Option<f64>,
    #[serde(default)]
    pub institution: Option<Institution>,
    #[serde(rename = "isAsset", default)]
    pub is_asset: Option<bool>,
    #[serde(rename = "includeInNetWorth", default)]
    pub include_in_net_worth: Option<bool>,
    #[serde(rename = "isManual", default)]
    pub is_manual: Option<bool>,
    #[serde(rename = "syncDisabled", default)]
    pub sync_disabled: Option<bool>,
    #[serde(rename = "deactivatedAt", default)]
    pub deactivated_at: Option<String>,
    #[serde(rename = "displayLastUpdatedAt", default)]
    pub display_last_updated_at: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub credential: Option<Credential>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub group_type: Option<CategoryGroupType>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub group: Option<CategoryGroup>,
}

/// Denormalized account snapshot embedded on a transaction. Not a live join:
/// it captures id + display name at write time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountRef {
    pub id: AccountId,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MerchantRef {
    pub id: MerchantId,
    pub name: String,
    #[serde(
        rename = "transactionsCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transactions_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Amount sign convention is fixed: negative = expense/debit, positive = income/credit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub pending: bool,
    #[serde(rename = "hideFromReports", default)]
    pub hide_from_reports: bool,
    #[serde(rename = "needsReview", default)]
    pub needs_review: bool,
    #[serde(rename = "plaidName", default)]
    pub plaid_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "isRecurring", default)]
    pub is_recurring: bool,
    #[serde(rename = "reviewStatus", default)]
    pub review_status: Option<String>,
    #[serde(rename = "isSplitTransaction", default)]
    pub is_split_transaction: bool,
    pub account: AccountRef,
    pub merchant: MerchantRef,
    pub category: CategoryRef,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// One page of filtered transactions. `total_count` covers every match,
/// independent of pagination; truncation is detectable by comparing it to
/// `results.len()`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionsPage {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    pub results: Vec<Transaction>,
}

impl TransactionsPage {
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            results: Vec::new(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.total_count > self.results.len() as u64
    }
}

/// Filter criteria for transaction listing. Every dimension is optional;
/// absence means "no restriction".
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub limit: usize,
    pub offset: usize,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub account_ids: Option<Vec<AccountId>>,
    pub category_ids: Option<Vec<CategoryId>>,
    pub search: Option<String>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            start_date: None,
            end_date: None,
            account_ids: None,
            category_ids: None,
            search: None,
        }
    }
}

impl TransactionQuery {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// Sparse field set for a partial update. `None` leaves the stored field
/// untouched; `Some` overwrites it, including `Some(String::new())`.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub category_id: Option<CategoryId>,
    pub merchant_name: Option<String>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub hide_from_reports: Option<bool>,
    pub needs_review: Option<bool>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.merchant_name.is_none()
            && self.notes.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.hide_from_reports.is_none()
            && self.needs_review.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: String,
    pub account_id: AccountId,
    pub amount: f64,
    pub merchant_name: String,
    pub category_id: CategoryId,
    pub notes: String,
    pub update_balance: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionSplit {
    pub amount: f64,
    #[serde(rename = "categoryId")]
    pub category_id: CategoryId,
    #[serde(rename = "merchantName", default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BulkTransactionUpdate {
    pub needs_review: Option<bool>,
    pub category_id: Option<CategoryId>,
    pub hide_from_reports: Option<bool>,
}

/// Per-item outcome of a bulk update: one failing transaction does not abort
/// the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateOutcome {
    #[serde(rename = "affectedCount")]
    pub affected_count: u64,
    pub errors: Vec<String>,
}

/// Standard rounding to two decimal places (not truncation).
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round_to_cents;

    #[test]
    fn rounding_is_standard_not_truncation() {
        assert_eq!(round_to_cents(-99.999), -100.00);
        assert_eq!(round_to_cents(12.344), 12.34);
        assert_eq!(round_to_cents(10.0 / 3.0), 3.33);
    }
}
