//! Client-side query engine for the local provider.
//!
//! Dates stay in their canonical `YYYY-MM-DD` string form throughout, so
//! lexicographic comparison is chronological comparison.

use crate::model::{Transaction, TransactionQuery, TransactionsPage};

/// Filter, sort (date descending) and paginate a transaction collection.
///
/// `total_count` reflects every transaction surviving the filters, independent
/// of `limit`/`offset`.
pub fn run_query(transactions: Vec<Transaction>, query: &TransactionQuery) -> TransactionsPage {
    let mut matched: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| matches_query(t, query))
        .collect();

    matched.sort_by(|a, b| b.date.cmp(&a.date));

    let total_count = matched.len() as u64;
    let results = matched
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    TransactionsPage {
        total_count,
        results,
    }
}

fn matches_query(t: &Transaction, query: &TransactionQuery) -> bool {
    if let Some(start) = query.start_date.as_deref()
        && t.date.as_str() < start
    {
        return false;
    }
    if let Some(end) = query.end_date.as_deref()
        && t.date.as_str() > end
    {
        return false;
    }
    if let Some(ids) = query.account_ids.as_ref()
        && !ids.contains(&t.account.id)
    {
        return false;
    }
    if let Some(ids) = query.category_ids.as_ref()
        && !ids.contains(&t.category.id)
    {
        return false;
    }
    if let Some(needle) = query.search.as_deref()
        && !search_matches(t, needle)
    {
        return false;
    }
    true
}

/// Case-insensitive substring match against merchant name, notes, or the
/// original statement text; any one field matching is enough.
pub fn search_matches(t: &Transaction, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    t.merchant.name.to_lowercase().contains(&needle)
        || t.notes
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&needle)
        || t.plaid_name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&needle)
}

/// Case-insensitive glob match with `*` (any run) and `?` (any one char).
/// The pattern must cover the whole text, so `net*` matches "Netflix" but
/// `flix` alone does not.
pub fn wildcard_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    let mut t = 0;
    let mut p = 0;
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            mark = t;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountRef, CategoryRef, MerchantRef};

    fn txn(id: &str, date: &str, account: &str, category: &str, merchant: &str) -> Transaction {
        Transaction {
            id: id.into(),
            amount: -10.0,
            date: date.to_string(),
            pending: false,
            hide_from_reports: false,
            needs_review: false,
            plaid_name: Some(format!("{} #1234", merchant.to_uppercase())),
            notes: None,
            is_recurring: false,
            review_status: None,
            is_split_transaction: false,
            account: AccountRef {
                id: account.into(),
                display_name: format!("Account {account}"),
            },
            merchant: MerchantRef {
                id: format!("merch_{merchant}").into(),
                name: merchant.to_string(),
                transactions_count: None,
            },
            category: CategoryRef {
                id: category.into(),
                name: format!("Category {category}"),
            },
            tags: Vec::new(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("t1", "2025-01-15", "a1", "c1", "Netflix"),
            txn("t2", "2025-03-01", "a1", "c2", "Whole Foods"),
            txn("t3", "2025-03-01", "a2", "c1", "Shell"),
            txn("t4", "2025-06-30", "a2", "c2", "Netflix"),
            txn("t5", "2024-12-31", "a1", "c1", "Rent Payments Inc"),
        ]
    }

    #[test]
    fn date_bounds_are_inclusive_on_both_ends() {
        let page = run_query(
            sample(),
            &TransactionQuery {
                start_date: Some("2025-01-15".to_string()),
                end_date: Some("2025-06-30".to_string()),
                ..TransactionQuery::default()
            },
        );
        let ids: Vec<&str> = page.results.iter().map(|t| t.id.as_str()).collect();
        // t1 sits exactly on the start bound, t4 exactly on the end bound.
        assert_eq!(ids, vec!["t4", "t2", "t3", "t1"]);
        assert_eq!(page.total_count, 4);
    }

    #[test]
    fn results_are_sorted_date_descending() {
        let page = run_query(sample(), &TransactionQuery::default());
        let dates: Vec<&str> = page.results.iter().map(|t| t.date.as_str()).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn total_count_is_independent_of_pagination() {
        let all = run_query(sample(), &TransactionQuery::with_limit(1000));
        let one = run_query(sample(), &TransactionQuery::with_limit(1));
        assert_eq!(all.total_count, one.total_count);
        assert_eq!(one.results.len(), 1);
        assert!(one.is_truncated());
        assert!(!all.is_truncated());
    }

    #[test]
    fn offset_slices_after_sorting() {
        let page = run_query(
            sample(),
            &TransactionQuery {
                limit: 2,
                offset: 1,
                ..TransactionQuery::default()
            },
        );
        let ids: Vec<&str> = page.results.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t3"]);
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn limit_larger_than_matches_returns_all_without_error() {
        let page = run_query(sample(), &TransactionQuery::with_limit(10_000));
        assert_eq!(page.results.len(), 5);
    }

    #[test]
    fn account_and_category_filters_use_membership() {
        let page = run_query(
            sample(),
            &TransactionQuery {
                account_ids: Some(vec!["a2".into()]),
                category_ids: Some(vec!["c1".into()]),
                ..TransactionQuery::default()
            },
        );
        let ids: Vec<&str> = page.results.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut txns = sample();
        txns[1].notes = Some("split with roommate".to_string());

        let by_merchant = run_query(
            txns.clone(),
            &TransactionQuery {
                search: Some("netflix".to_string()),
                ..TransactionQuery::default()
            },
        );
        assert_eq!(by_merchant.total_count, 2);

        let by_notes = run_query(
            txns.clone(),
            &TransactionQuery {
                search: Some("ROOMMATE".to_string()),
                ..TransactionQuery::default()
            },
        );
        assert_eq!(by_notes.total_count, 1);

        // plaid_name holds the uppercased statement text
        let by_statement = run_query(
            txns,
            &TransactionQuery {
                search: Some("shell #".to_string()),
                ..TransactionQuery::default()
            },
        );
        assert_eq!(by_statement.total_count, 1);
    }

    #[test]
    fn no_matches_yields_empty_page() {
        let page = run_query(
            sample(),
            &TransactionQuery {
                search: Some("no such merchant".to_string()),
                ..TransactionQuery::default()
            },
        );
        assert_eq!(page.total_count, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn wildcard_match_requires_full_cover() {
        assert!(wildcard_match("Netflix", "netflix"));
        assert!(wildcard_match("Netflix", "net*"));
        assert!(wildcard_match("Netflix", "*flix"));
        assert!(wildcard_match("Whole Foods", "*foods*"));
        assert!(wildcard_match("Shell", "sh?ll"));
        assert!(!wildcard_match("Netflix", "flix"));
        assert!(!wildcard_match("Netflix", "net"));
        assert!(wildcard_match("", "*"));
        assert!(!wildcard_match("x", ""));
    }
}
