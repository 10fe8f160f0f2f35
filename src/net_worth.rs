//! Net-worth report built from the account list.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::{Account, round_to_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Manual,
    Disabled,
    Disconnected,
    UpdateRequired,
    Stale,
    Recent,
    Current,
    Unknown,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Manual => "manual",
            SyncStatus::Disabled => "disabled",
            SyncStatus::Disconnected => "disconnected",
            SyncStatus::UpdateRequired => "update_required",
            SyncStatus::Stale => "stale",
            SyncStatus::Recent => "recent",
            SyncStatus::Current => "current",
            SyncStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

pub fn sync_status(account: &Account, now: DateTime<Utc>) -> SyncStatus {
    if account.is_manual.unwrap_or(false) {
        return SyncStatus::Manual;
    }
    if account.sync_disabled.unwrap_or(false) {
        return SyncStatus::Disabled;
    }

    if let Some(credential) = account.credential.as_ref() {
        if credential.disconnected_from_data_provider_at.is_some() {
            return SyncStatus::Disconnected;
        }
        if credential.update_required.unwrap_or(false) {
            return SyncStatus::UpdateRequired;
        }
    }

    let Some(last_updated) = account.display_last_updated_at.as_deref() else {
        return SyncStatus::Unknown;
    };
    let Ok(updated_at) = DateTime::parse_from_rfc3339(last_updated) else {
        return SyncStatus::Unknown;
    };

    let age = now.signed_duration_since(updated_at.with_timezone(&Utc));
    if age > Duration::days(7) {
        SyncStatus::Stale
    } else if age > Duration::days(1) {
        SyncStatus::Recent
    } else {
        SyncStatus::Current
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountEntry {
    pub name: String,
    pub mask: Option<String>,
    pub balance: f64,
    pub institution: Option<String>,
    pub subtype: Option<String>,
    pub sync_status: SyncStatus,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountGroup {
    pub category: String,
    pub total: f64,
    pub accounts: Vec<AccountEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub total: f64,
    pub categories: Vec<AccountGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetWorthReport {
    pub date: String,
    pub net_worth: f64,
    pub assets: Section,
    pub liabilities: Section,
}

/// Groups net-worth-included accounts by asset/liability and account type.
/// Accounts excluded from net worth are dropped entirely.
pub fn build_report(accounts: &[Account], now: DateTime<Utc>) -> NetWorthReport {
    let mut assets: BTreeMap<String, Vec<AccountEntry>> = BTreeMap::new();
    let mut liabilities: BTreeMap<String, Vec<AccountEntry>> = BTreeMap::new();

    for account in accounts {
        if !account.include_in_net_worth.unwrap_or(true) {
            continue;
        }

        let type_display = account
            .account_type
            .as_ref()
            .and_then(|t| t.display.clone())
            .unwrap_or_else(|| "Other".to_string());

        let entry = AccountEntry {
            name: account.display_name.clone(),
            mask: account.mask.clone(),
            balance: round_to_cents(account.current_balance.unwrap_or(0.0)),
            institution: account.institution.as_ref().and_then(|i| i.name.clone()),
            subtype: account.subtype.as_ref().and_then(|s| s.display.clone()),
            sync_status: sync_status(account, now),
            last_updated: account.display_last_updated_at.clone(),
        };

        if account.is_asset.unwrap_or(true) {
            assets.entry(type_display).or_default().push(entry);
        } else {
            liabilities.entry(type_display).or_default().push(entry);
        }
    }

    let asset_groups = build_groups(assets);
    let liability_groups = build_groups(liabilities);

    let assets_total = round_to_cents(asset_groups.iter().map(|g| g.total).sum());
    let liabilities_total = round_to_cents(liability_groups.iter().map(|g| g.total.abs()).sum());

    NetWorthReport {
        date: now.format("%Y-%m-%d").to_string(),
        net_worth: round_to_cents(assets_total - liabilities_total),
        assets: Section {
            total: assets_total,
            categories: asset_groups,
        },
        liabilities: Section {
            total: liabilities_total,
            categories: liability_groups,
        },
    }
}

fn build_groups(grouped: BTreeMap<String, Vec<AccountEntry>>) -> Vec<AccountGroup> {
    let mut groups: Vec<AccountGroup> = grouped
        .into_iter()
        .map(|(category, mut accounts)| {
            accounts.sort_by(|a, b| b.balance.abs().total_cmp(&a.balance.abs()));
            let total = round_to_cents(accounts.iter().map(|a| a.balance).sum());
            AccountGroup {
                category,
                total,
                accounts,
            }
        })
        .collect();
    groups.sort_by(|a, b| b.total.abs().total_cmp(&a.total.abs()));
    groups
}
