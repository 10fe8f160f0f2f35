//! Name-to-id resolution for user-facing account and category names.
//!
//! Single-target resolution (update/create flows) tries a case-insensitive
//! exact match first and falls back to a substring match; the first hit wins.
//! Multi-select resolution (list filtering) matches `*`-glob patterns and
//! returns the union of ids matching any pattern.

use crate::error::{Entity, ProviderError, Result};
use crate::filter::wildcard_match;
use crate::model::{Account, Category};
use crate::types::{AccountId, CategoryId};

pub fn resolve_category(categories: &[Category], name: &str) -> Result<CategoryId> {
    resolve_one(
        categories.iter().map(|c| (c.name.as_str(), &c.id)),
        name,
        Entity::Category,
    )
    .cloned()
}

pub fn resolve_account(accounts: &[Account], name: &str) -> Result<AccountId> {
    resolve_one(
        accounts.iter().map(|a| (a.display_name.as_str(), &a.id)),
        name,
        Entity::Account,
    )
    .cloned()
}

fn resolve_one<'a, Id>(
    candidates: impl Iterator<Item = (&'a str, &'a Id)> + Clone,
    name: &str,
    entity: Entity,
) -> Result<&'a Id> {
    let want = name.trim().to_lowercase();
    if want.is_empty() {
        return Err(ProviderError::not_found(entity, name));
    }

    if let Some((_, id)) = candidates
        .clone()
        .find(|(n, _)| n.to_lowercase() == want)
    {
        return Ok(id);
    }

    candidates
        .into_iter()
        .find(|(n, _)| n.to_lowercase().contains(&want))
        .map(|(_, id)| id)
        .ok_or_else(|| ProviderError::not_found(entity, name))
}

pub fn resolve_category_ids(categories: &[Category], patterns: &[String]) -> Result<Vec<CategoryId>> {
    let ids: Vec<CategoryId> = categories
        .iter()
        .filter(|c| patterns.iter().any(|p| wildcard_match(&c.name, p)))
        .map(|c| c.id.clone())
        .collect();
    if ids.is_empty() {
        return Err(ProviderError::not_found(
            Entity::Category,
            patterns.join(", "),
        ));
    }
    Ok(ids)
}

pub fn resolve_account_ids(accounts: &[Account], patterns: &[String]) -> Result<Vec<AccountId>> {
    let ids: Vec<AccountId> = accounts
        .iter()
        .filter(|a| patterns.iter().any(|p| wildcard_match(&a.display_name, p)))
        .map(|a| a.id.clone())
        .collect();
    if ids.is_empty() {
        return Err(ProviderError::not_found(
            Entity::Account,
            patterns.join(", "),
        ));
    }
    Ok(ids)
}
