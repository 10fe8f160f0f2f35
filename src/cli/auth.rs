use serde_json::json;

use crate::config::{load_token, save_token, token_path};
use crate::provider::{ProviderKind, open_provider};

use super::render::{KeyValueRow, print_json, render_rows};
use super::{AuthCmd, Cli, OutputFormat, provider_config};

pub(super) fn run_auth(cli: &Cli, cmd: AuthCmd) -> anyhow::Result<()> {
    match cmd {
        AuthCmd::Status => {
            let token_source = if cli.token.is_some() {
                Some("env".to_string())
            } else {
                let p = cli.token_file.clone().unwrap_or_else(token_path);
                load_token(&p).ok().map(|_| "file".to_string())
            };

            // A cheap read validates the token against the configured backend.
            let valid = if token_source.is_some() && cli.provider == ProviderKind::Api {
                let checked = open_provider(provider_config(cli))
                    .and_then(|p| p.get_accounts())
                    .is_ok();
                Some(checked)
            } else {
                None
            };

            if cli.output == OutputFormat::Json {
                let mut out = serde_json::Map::new();
                out.insert(
                    "token_configured".to_string(),
                    json!(token_source.is_some()),
                );
                if let Some(source) = &token_source {
                    out.insert("token_source".to_string(), json!(source));
                }
                out.insert(
                    "token_valid".to_string(),
                    valid.map_or_else(|| json!("unknown"), |v| json!(v)),
                );
                return print_json(&serde_json::Value::Object(out));
            }

            let mut rows = vec![KeyValueRow {
                key: "token_configured".to_string(),
                value: token_source.is_some().to_string(),
            }];
            if let Some(source) = &token_source {
                rows.push(KeyValueRow {
                    key: "token_source".to_string(),
                    value: source.clone(),
                });
            }
            rows.push(KeyValueRow {
                key: "token_valid".to_string(),
                value: valid.map_or_else(|| "unknown".to_string(), |v| v.to_string()),
            });
            render_rows(cli, &rows)
        }
        AuthCmd::SetToken(args) => {
            if cli.dry_run {
                println!("dry-run: would prompt for token and write it to disk");
                return Ok(());
            }

            let token = if let Some(t) = cli.token.clone() {
                t
            } else {
                rpassword::prompt_password("Paste Monarch token (input hidden): ")?
            };

            if token.trim().is_empty() {
                anyhow::bail!("empty token");
            }

            let p = args
                .token_file
                .or_else(|| cli.token_file.clone())
                .unwrap_or_else(token_path);
            save_token(&p, token.trim())?;
            println!("saved token to {}", p.display());
            Ok(())
        }
        AuthCmd::Logout => {
            let p = cli.token_file.clone().unwrap_or_else(token_path);
            if p.exists() {
                std::fs::remove_file(&p)?;
            }
            println!("removed token at {}", p.display());
            Ok(())
        }
    }
}
