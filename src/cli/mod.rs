use std::io::IsTerminal;
use std::path::PathBuf;

use clap::builder::ArgGroup;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::DEFAULT_BASE_URL;
use crate::config::{load_token, token_path};
use crate::provider::{ProviderConfig, ProviderKind, open_provider};
use crate::types::{AccountId, CategoryId, TransactionId};

mod accounts;
mod auth;
mod render;
mod transactions;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "monarch")]
#[command(about = "CLI for Monarch Money (unofficial)", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip confirmation prompts for write actions (required in non-interactive runs).
    #[arg(long, global = true, default_value_t = false)]
    pub yes: bool,

    /// Data backend: the remote API or a local JSON store.
    #[arg(
        long,
        value_enum,
        global = true,
        env = "MONARCH_PROVIDER",
        default_value_t = ProviderKind::Api
    )]
    pub provider: ProviderKind,

    /// Path to the local JSON store (required with `--provider local`).
    #[arg(long, global = true, env = "MONARCH_LOCAL_DB")]
    pub local_db: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "MONARCH_BASE_URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    #[arg(long, global = true, env = "MONARCH_TOKEN")]
    pub token: Option<String>,

    #[arg(long, global = true, env = "MONARCH_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    #[arg(long, global = true, env = "MONARCH_FIXTURES_DIR", hide = true)]
    pub fixtures_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    Auth {
        #[command(subcommand)]
        cmd: AuthCmd,
    },
    /// List accounts.
    Accounts,
    /// List transaction categories.
    Categories,
    /// Net worth summary grouped by account type.
    NetWorth,
    Transactions {
        #[command(subcommand)]
        cmd: TransactionsCmd,
    },
    Version,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AuthCmd {
    Status,
    SetToken(AuthSetTokenArgs),
    Logout,
}

#[derive(Debug, Clone, Args)]
pub struct AuthSetTokenArgs {
    /// Where to store the token (defaults to `~/.config/monarch/token`)
    #[arg(long)]
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransactionsCmd {
    List(TransactionsListArgs),
    Get(TransactionsGetArgs),
    Update(TransactionsUpdateArgs),
    Create(TransactionsCreateArgs),
    Split(TransactionsSplitArgs),
    Review(TransactionsReviewArgs),
    Unreview(TransactionsReviewArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TransactionsListArgs {
    #[arg(long, default_value_t = 100)]
    pub limit: usize,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Earliest date to include (YYYY-MM-DD or MM-DD-YYYY, inclusive).
    #[arg(long)]
    pub start: Option<String>,

    /// Latest date to include (YYYY-MM-DD or MM-DD-YYYY, inclusive).
    #[arg(long)]
    pub end: Option<String>,

    /// Filter to accounts whose name matches this `*`-glob (repeatable).
    #[arg(long, value_name = "PATTERN")]
    pub account: Vec<String>,

    /// Filter to specific account ids (repeatable).
    #[arg(long)]
    pub account_id: Vec<AccountId>,

    /// Filter to categories whose name matches this `*`-glob (repeatable).
    #[arg(long, value_name = "PATTERN")]
    pub category: Vec<String>,

    /// Filter to specific category ids (repeatable).
    #[arg(long)]
    pub category_id: Vec<CategoryId>,

    /// Substring search across merchant, notes, and original statement.
    #[arg(long)]
    pub search: Option<String>,

    /// Keep only transactions whose merchant name matches this `*`-glob.
    #[arg(long, value_name = "PATTERN")]
    pub merchant: Option<String>,

    /// Keep only transactions whose notes match this `*`-glob.
    #[arg(long, value_name = "PATTERN")]
    pub notes: Option<String>,

    /// Keep only transactions whose original statement matches this `*`-glob.
    #[arg(long, value_name = "PATTERN")]
    pub original_statement: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TransactionsGetArgs {
    pub id: TransactionId,
}

#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("category_target").args(["category_id", "category"])
))]
pub struct TransactionsUpdateArgs {
    pub id: TransactionId,

    /// New category by name (case-insensitive; falls back to substring match).
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub category_id: Option<CategoryId>,

    /// New merchant display name (the merchant id is preserved).
    #[arg(long)]
    pub merchant: Option<String>,

    /// New notes; pass an empty string to clear them.
    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<f64>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub hide_from_reports: Option<bool>,

    #[arg(long)]
    pub needs_review: Option<bool>,
}

#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("account_target")
        .required(true)
        .args(["account_id", "account"])
))]
#[command(group(
    ArgGroup::new("category_target")
        .required(true)
        .args(["category_id", "category"])
))]
pub struct TransactionsCreateArgs {
    #[arg(long)]
    pub date: String,

    /// Target account by name (case-insensitive; falls back to substring match).
    #[arg(long)]
    pub account: Option<String>,

    #[arg(long)]
    pub account_id: Option<AccountId>,

    /// Signed amount: negative = expense, positive = income.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: f64,

    #[arg(long)]
    pub merchant: String,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub category_id: Option<CategoryId>,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// Also adjust the account's current balance by the amount.
    #[arg(long, default_value_t = false)]
    pub update_balance: bool,
}

#[derive(Debug, Clone, Args)]
pub struct TransactionsSplitArgs {
    pub id: TransactionId,

    /// Split parts as a JSON array of `{amount, categoryId, merchantName?, notes?}`.
    #[arg(long)]
    pub splits_json: String,
}

#[derive(Debug, Clone, Args)]
pub struct TransactionsReviewArgs {
    pub ids: Vec<TransactionId>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Version = &cli.command {
        println!("monarch-money-cli {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Command::Auth { cmd } = &cli.command {
        return auth::run_auth(&cli, cmd.clone());
    }

    let provider = open_provider(provider_config(&cli))?;

    match &cli.command {
        Command::Accounts => accounts::run_accounts(&cli, provider.as_ref()),
        Command::Categories => accounts::run_categories(&cli, provider.as_ref()),
        Command::NetWorth => accounts::run_net_worth(&cli, provider.as_ref()),
        Command::Transactions { cmd } => {
            transactions::run_transactions(&cli, provider.as_ref(), cmd.clone())
        }
        Command::Auth { .. } | Command::Version => unreachable!(),
    }
}

pub(crate) fn provider_config(cli: &Cli) -> ProviderConfig {
    let token_file_path = cli.token_file.clone().unwrap_or_else(token_path);
    let token = cli
        .token
        .clone()
        .or_else(|| load_token(&token_file_path).ok());

    ProviderConfig {
        kind: cli.provider,
        base_url: cli.base_url.clone(),
        token,
        fixtures_dir: cli.fixtures_dir.clone(),
        local_db: cli.local_db.clone(),
    }
}

fn fmt_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

fn normalize_date(s: &str) -> Option<String> {
    let s = s.trim();
    if s.len() != 10 {
        return None;
    }

    let parts = s.split('-').collect::<Vec<_>>();
    if parts.len() != 3 {
        return None;
    }

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2], parts[0], parts[1])
    } else {
        return None;
    };

    let y = year.parse::<u32>().ok()?;
    let m = month.parse::<u32>().ok()?;
    let d = day.parse::<u32>().ok()?;
    if !(1900..=2100).contains(&y) || !(1..=12).contains(&m) || !(1..=31).contains(&d) {
        return None;
    }
    Some(format!("{y:04}-{m:02}-{d:02}"))
}

fn parse_date_arg(s: &str, flag: &str) -> anyhow::Result<String> {
    normalize_date(s)
        .ok_or_else(|| anyhow::anyhow!("invalid {flag} date {s:?} (expected YYYY-MM-DD)"))
}

fn should_color(cli: &Cli) -> bool {
    match cli.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

fn confirm_write(cli: &Cli, action: &str) -> anyhow::Result<()> {
    if cli.dry_run {
        return Ok(());
    }
    if cli.yes {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("refusing to write in non-interactive mode without --yes");
    }

    eprintln!("{action}");
    let input = rpassword::prompt_password("Proceed? Type 'yes' to confirm: ")?;
    if input.trim() != "yes" {
        anyhow::bail!("aborted");
    }
    Ok(())
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn normalize_date_accepts_yyyy_mm_dd_and_mm_dd_yyyy() {
        assert_eq!(normalize_date("2025-12-03"), Some("2025-12-03".to_string()));
        assert_eq!(normalize_date("12-03-2025"), Some("2025-12-03".to_string()));
        assert_eq!(normalize_date("03-12-2025"), Some("2025-03-12".to_string()));
    }

    #[test]
    fn normalize_date_rejects_invalid() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("2025-13-01"), None);
        assert_eq!(normalize_date("2025-00-01"), None);
        assert_eq!(normalize_date("2025-12-32"), None);
        assert_eq!(normalize_date("2025/12/01"), None);
    }

    #[test]
    fn money_string_formats_sign_outside_dollar() {
        assert_eq!(fmt_money(-57.48), "-$57.48");
        assert_eq!(fmt_money(185.4), "$185.40");
        assert_eq!(fmt_money(0.0), "$0.00");
    }
}
