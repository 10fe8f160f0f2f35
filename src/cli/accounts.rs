use chrono::Utc;
use comfy_table::{Cell, CellAlignment, Color};

use crate::net_worth::{NetWorthReport, build_report};
use crate::provider::Provider;

use super::render::{TableRow, print_json, render_rows, shorten_id_for_table};
use super::{Cli, OutputFormat, fmt_money, should_color};

struct AccountRow {
    id: String,
    name: String,
    kind: String,
    balance: Option<f64>,
    institution: String,
    mask: String,
    color: bool,
}

impl TableRow for AccountRow {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "type", "balance", "institution", "mask"];

    fn values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.kind.clone(),
            self.balance.map(fmt_money).unwrap_or_default(),
            self.institution.clone(),
            self.mask.clone(),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::new(shorten_id_for_table(&self.id)),
            Cell::new(&self.name),
            Cell::new(&self.kind),
            money_cell(self.balance.map(fmt_money).unwrap_or_default(), self.color),
            Cell::new(&self.institution),
            Cell::new(&self.mask),
        ]
    }
}

pub(super) fn money_cell(s: String, color: bool) -> Cell {
    let mut cell = Cell::new(&s).set_alignment(CellAlignment::Right);
    if color && !s.is_empty() {
        if s.starts_with("-$") {
            cell = cell.fg(Color::Red);
        } else {
            cell = cell.fg(Color::Green);
        }
    }
    cell
}

pub(super) fn run_accounts(cli: &Cli, provider: &dyn Provider) -> anyhow::Result<()> {
    let accounts = provider.get_accounts()?;
    if cli.output == OutputFormat::Json {
        return print_json(&accounts);
    }

    let color = should_color(cli);
    let rows: Vec<AccountRow> = accounts
        .iter()
        .map(|a| AccountRow {
            id: a.id.to_string(),
            name: a.display_name.clone(),
            kind: a
                .account_type
                .as_ref()
                .and_then(|t| t.display.clone())
                .unwrap_or_default(),
            balance: a.current_balance,
            institution: a
                .institution
                .as_ref()
                .and_then(|i| i.name.clone())
                .unwrap_or_default(),
            mask: a.mask.clone().unwrap_or_default(),
            color,
        })
        .collect();
    render_rows(cli, &rows)
}

struct CategoryRow {
    id: String,
    name: String,
    icon: String,
    group: String,
    group_type: String,
}

impl TableRow for CategoryRow {
    const HEADERS: &'static [&'static str] = &["id", "name", "icon", "group", "type"];

    fn values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.icon.clone(),
            self.group.clone(),
            self.group_type.clone(),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::new(shorten_id_for_table(&self.id)),
            Cell::new(&self.name),
            Cell::new(&self.icon),
            Cell::new(&self.group),
            Cell::new(&self.group_type),
        ]
    }
}

pub(super) fn run_categories(cli: &Cli, provider: &dyn Provider) -> anyhow::Result<()> {
    let categories = provider.get_categories()?;
    if cli.output == OutputFormat::Json {
        return print_json(&categories);
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: c.name.clone(),
            icon: c.icon.clone().unwrap_or_default(),
            group: c
                .group
                .as_ref()
                .and_then(|g| g.name.clone())
                .unwrap_or_default(),
            group_type: c
                .group
                .as_ref()
                .and_then(|g| g.group_type.as_ref())
                .map(|t| t.to_string())
                .unwrap_or_default(),
        })
        .collect();
    render_rows(cli, &rows)
}

struct NetWorthRow {
    section: String,
    category: String,
    account: String,
    institution: String,
    balance: f64,
    sync_status: String,
    color: bool,
}

impl TableRow for NetWorthRow {
    const HEADERS: &'static [&'static str] = &[
        "section",
        "category",
        "account",
        "institution",
        "balance",
        "sync",
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.section.clone(),
            self.category.clone(),
            self.account.clone(),
            self.institution.clone(),
            fmt_money(self.balance),
            self.sync_status.clone(),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.section),
            Cell::new(&self.category),
            Cell::new(&self.account),
            Cell::new(&self.institution),
            money_cell(fmt_money(self.balance), self.color),
            Cell::new(&self.sync_status),
        ]
    }
}

pub(super) fn run_net_worth(cli: &Cli, provider: &dyn Provider) -> anyhow::Result<()> {
    let accounts = provider.get_accounts()?;
    let report = build_report(&accounts, Utc::now());

    if cli.output == OutputFormat::Json {
        return print_json(&report);
    }

    let rows = report_rows(&report, should_color(cli));
    render_rows(cli, &rows)?;

    if cli.output == OutputFormat::Table {
        println!("assets:      {}", fmt_money(report.assets.total));
        println!("liabilities: {}", fmt_money(report.liabilities.total));
        println!("net worth:   {}", fmt_money(report.net_worth));
    }
    Ok(())
}

fn report_rows(report: &NetWorthReport, color: bool) -> Vec<NetWorthRow> {
    let mut rows = Vec::new();
    for (section, groups) in [
        ("assets", &report.assets.categories),
        ("liabilities", &report.liabilities.categories),
    ] {
        for group in groups {
            for account in &group.accounts {
                rows.push(NetWorthRow {
                    section: section.to_string(),
                    category: group.category.clone(),
                    account: account.name.clone(),
                    institution: account.institution.clone().unwrap_or_default(),
                    balance: account.balance,
                    sync_status: account.sync_status.to_string(),
                    color,
                });
            }
        }
    }
    rows
}
