use anyhow::Context;
use comfy_table::Cell;
use serde_json::json;

use crate::filter::wildcard_match;
use crate::model::{
    BulkTransactionUpdate, BulkUpdateOutcome, NewTransaction, Transaction, TransactionQuery,
    TransactionSplit, TransactionUpdate,
};
use crate::provider::Provider;
use crate::resolve::{
    resolve_account, resolve_account_ids, resolve_category, resolve_category_ids,
};
use crate::types::CategoryId;

use super::accounts::money_cell;
use super::render::{KeyValueRow, TableRow, print_json, render_rows, shorten_id_for_table};
use super::{
    Cli, OutputFormat, TransactionsCmd, TransactionsCreateArgs, TransactionsListArgs,
    TransactionsUpdateArgs, confirm_write, fmt_money, parse_date_arg, should_color,
};

struct TransactionRow {
    id: String,
    date: String,
    merchant: String,
    amount: f64,
    category: String,
    account: String,
    notes: String,
    color: bool,
}

impl TransactionRow {
    fn from_transaction(t: &Transaction, color: bool) -> Self {
        Self {
            id: t.id.to_string(),
            date: t.date.clone(),
            merchant: t.merchant.name.clone(),
            amount: t.amount,
            category: t.category.name.clone(),
            account: t.account.display_name.clone(),
            notes: t.notes.clone().unwrap_or_default(),
            color,
        }
    }
}

impl TableRow for TransactionRow {
    const HEADERS: &'static [&'static str] = &[
        "id", "date", "merchant", "amount", "category", "account", "notes",
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.clone(),
            self.merchant.clone(),
            fmt_money(self.amount),
            self.category.clone(),
            self.account.clone(),
            self.notes.clone(),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::new(shorten_id_for_table(&self.id)),
            Cell::new(&self.date),
            Cell::new(&self.merchant),
            money_cell(fmt_money(self.amount), self.color),
            Cell::new(&self.category),
            Cell::new(&self.account),
            Cell::new(&self.notes),
        ]
    }
}

pub(super) fn run_transactions(
    cli: &Cli,
    provider: &dyn Provider,
    cmd: TransactionsCmd,
) -> anyhow::Result<()> {
    match cmd {
        TransactionsCmd::List(args) => run_list(cli, provider, args),
        TransactionsCmd::Get(args) => {
            let txn = provider.get_transaction(&args.id)?;
            render_transaction(cli, &txn)
        }
        TransactionsCmd::Update(args) => run_update(cli, provider, args),
        TransactionsCmd::Create(args) => run_create(cli, provider, args),
        TransactionsCmd::Split(args) => {
            let splits: Vec<TransactionSplit> =
                serde_json::from_str(&args.splits_json).context("failed to parse --splits-json")?;
            if splits.is_empty() {
                anyhow::bail!("--splits-json must contain at least one split");
            }

            if cli.dry_run {
                println!(
                    "dry-run: would split transaction {} into {} parts",
                    args.id,
                    splits.len()
                );
                return Ok(());
            }
            confirm_write(
                cli,
                &format!("Split transaction {} into {} parts", args.id, splits.len()),
            )?;
            let txn = provider.split_transaction(&args.id, &splits)?;
            render_transaction(cli, &txn)
        }
        TransactionsCmd::Review(args) => run_bulk_review(cli, provider, &args.ids, false),
        TransactionsCmd::Unreview(args) => run_bulk_review(cli, provider, &args.ids, true),
    }
}

fn run_list(cli: &Cli, provider: &dyn Provider, args: TransactionsListArgs) -> anyhow::Result<()> {
    let account_ids = selection_ids(args.account_id.clone(), &args.account, || {
        let accounts = provider.get_accounts()?;
        Ok(resolve_account_ids(&accounts, &args.account)?)
    })?;
    let category_ids = selection_ids(args.category_id.clone(), &args.category, || {
        let categories = provider.get_categories()?;
        Ok(resolve_category_ids(&categories, &args.category)?)
    })?;

    let query = TransactionQuery {
        limit: args.limit,
        offset: args.offset,
        start_date: args.start.as_deref().map(|s| parse_date_arg(s, "--start")).transpose()?,
        end_date: args.end.as_deref().map(|s| parse_date_arg(s, "--end")).transpose()?,
        account_ids,
        category_ids,
        search: args.search.clone(),
    };

    let page = provider.get_transactions(&query)?;
    let shown = page.results.len();
    let truncated = page.is_truncated();
    let total_count = page.total_count;

    let results: Vec<Transaction> = page
        .results
        .into_iter()
        .filter(|t| {
            glob_keep(args.merchant.as_deref(), &t.merchant.name)
                && glob_keep(args.notes.as_deref(), t.notes.as_deref().unwrap_or(""))
                && glob_keep(
                    args.original_statement.as_deref(),
                    t.plaid_name.as_deref().unwrap_or(""),
                )
        })
        .collect();

    let message = truncated.then(|| {
        format!(
            "showing {shown} of {total_count} matching transactions; adjust --limit/--offset to see more"
        )
    });

    if cli.output == OutputFormat::Json {
        let mut out = json!({
            "totalCount": total_count,
            "results": results,
        });
        if let Some(msg) = &message {
            out["truncated"] = json!(true);
            out["message"] = json!(msg);
        }
        return print_json(&out);
    }

    let color = should_color(cli);
    let rows: Vec<TransactionRow> = results
        .iter()
        .map(|t| TransactionRow::from_transaction(t, color))
        .collect();
    render_rows(cli, &rows)?;
    if let Some(msg) = message {
        eprintln!("{msg}");
    }
    Ok(())
}

/// Merges explicit ids with ids resolved from name patterns. `None` when the
/// user asked for no restriction.
fn selection_ids<Id>(
    explicit: Vec<Id>,
    patterns: &[String],
    resolve: impl FnOnce() -> anyhow::Result<Vec<Id>>,
) -> anyhow::Result<Option<Vec<Id>>> {
    let mut ids = explicit;
    if !patterns.is_empty() {
        ids.extend(resolve()?);
    }
    Ok(if ids.is_empty() { None } else { Some(ids) })
}

fn glob_keep(pattern: Option<&str>, text: &str) -> bool {
    match pattern {
        None => true,
        Some(p) => wildcard_match(text, p),
    }
}

fn run_update(
    cli: &Cli,
    provider: &dyn Provider,
    args: TransactionsUpdateArgs,
) -> anyhow::Result<()> {
    let category_id = resolve_category_target(provider, args.category_id, args.category.as_deref())?;

    let update = TransactionUpdate {
        category_id,
        merchant_name: args.merchant.clone(),
        notes: args.notes.clone(),
        amount: args.amount,
        date: args
            .date
            .as_deref()
            .map(|s| parse_date_arg(s, "--date"))
            .transpose()?,
        hide_from_reports: args.hide_from_reports,
        needs_review: args.needs_review,
    };
    if update.is_empty() {
        anyhow::bail!("nothing to update; pass at least one field flag");
    }

    if cli.dry_run {
        println!("dry-run: would update transaction {}", args.id);
        return Ok(());
    }
    confirm_write(cli, &format!("Update transaction {}", args.id))?;

    let txn = provider.update_transaction(&args.id, &update)?;
    render_transaction(cli, &txn)
}

fn run_create(
    cli: &Cli,
    provider: &dyn Provider,
    args: TransactionsCreateArgs,
) -> anyhow::Result<()> {
    let account_id = match (args.account_id, args.account.as_deref()) {
        (Some(id), _) => id,
        (None, Some(name)) => {
            let accounts = provider.get_accounts()?;
            resolve_account(&accounts, name)?
        }
        (None, None) => unreachable!("clap group requires one"),
    };
    let category_id = resolve_category_target(provider, args.category_id, args.category.as_deref())?
        .ok_or_else(|| anyhow::anyhow!("missing category target"))?;

    let new = NewTransaction {
        date: parse_date_arg(&args.date, "--date")?,
        account_id,
        amount: args.amount,
        merchant_name: args.merchant.clone(),
        category_id,
        notes: args.notes.clone(),
        update_balance: args.update_balance,
    };

    if cli.dry_run {
        println!(
            "dry-run: would create {} transaction at {} for {}",
            fmt_money(new.amount),
            new.merchant_name,
            new.date
        );
        return Ok(());
    }
    confirm_write(
        cli,
        &format!(
            "Create {} transaction at {} on {}",
            fmt_money(new.amount),
            new.merchant_name,
            new.date
        ),
    )?;

    let txn = provider.create_transaction(&new)?;
    render_transaction(cli, &txn)
}

fn resolve_category_target(
    provider: &dyn Provider,
    category_id: Option<CategoryId>,
    category_name: Option<&str>,
) -> anyhow::Result<Option<CategoryId>> {
    if let Some(id) = category_id {
        return Ok(Some(id));
    }
    let Some(name) = category_name else {
        return Ok(None);
    };
    let categories = provider.get_categories()?;
    Ok(Some(resolve_category(&categories, name)?))
}

fn run_bulk_review(
    cli: &Cli,
    provider: &dyn Provider,
    ids: &[crate::types::TransactionId],
    needs_review: bool,
) -> anyhow::Result<()> {
    if ids.is_empty() {
        anyhow::bail!("pass at least one transaction id");
    }

    let action = if needs_review { "unreviewed" } else { "reviewed" };
    if cli.dry_run {
        println!("dry-run: would mark {action}: {ids:?}");
        return Ok(());
    }
    confirm_write(cli, &format!("Mark {action}: {ids:?}"))?;

    let update = BulkTransactionUpdate {
        needs_review: Some(needs_review),
        ..BulkTransactionUpdate::default()
    };
    let outcome = provider.bulk_update_transactions(ids, &update)?;
    render_bulk_outcome(cli, &outcome)
}

fn render_bulk_outcome(cli: &Cli, outcome: &BulkUpdateOutcome) -> anyhow::Result<()> {
    if cli.output == OutputFormat::Json {
        return print_json(outcome);
    }

    let mut rows = vec![KeyValueRow {
        key: "affected_count".to_string(),
        value: outcome.affected_count.to_string(),
    }];
    for err in &outcome.errors {
        rows.push(KeyValueRow {
            key: "error".to_string(),
            value: err.clone(),
        });
    }
    render_rows(cli, &rows)
}

fn render_transaction(cli: &Cli, txn: &Transaction) -> anyhow::Result<()> {
    if cli.output == OutputFormat::Json {
        return print_json(txn);
    }

    let rows = vec![
        kv("id", txn.id.to_string()),
        kv("date", txn.date.clone()),
        kv("merchant", txn.merchant.name.clone()),
        kv("amount", fmt_money(txn.amount)),
        kv("category", txn.category.name.clone()),
        kv("account", txn.account.display_name.clone()),
        kv("notes", txn.notes.clone().unwrap_or_default()),
        kv("pending", txn.pending.to_string()),
        kv("needs_review", txn.needs_review.to_string()),
        kv("hide_from_reports", txn.hide_from_reports.to_string()),
        kv(
            "tags",
            txn.tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        ),
    ];
    render_rows(cli, &rows)
}

fn kv(key: &str, value: String) -> KeyValueRow {
    KeyValueRow {
        key: key.to_string(),
        value,
    }
}
