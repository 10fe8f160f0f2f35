use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};

use crate::error::{ProviderError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.monarchmoney.com";

#[derive(Debug, Clone)]
pub enum ClientMode {
    Http {
        base_url: String,
        token: Option<String>,
    },
    /// Reads canned `{OperationName}.json` response bodies from a directory
    /// instead of hitting the network. Used by tests.
    Fixtures(PathBuf),
}

/// Lightweight blocking client for the Monarch Money GraphQL API.
#[derive(Debug, Clone)]
pub struct MonarchClient {
    mode: ClientMode,
}

impl MonarchClient {
    pub fn new(mode: ClientMode) -> Self {
        Self { mode }
    }

    /// Executes one GraphQL operation and returns the `data` object.
    pub fn graphql(
        &self,
        operation_name: &str,
        query: &str,
        variables: Value,
    ) -> Result<Value> {
        match &self.mode {
            ClientMode::Fixtures(dir) => {
                let path = dir.join(format!("{operation_name}.json"));
                let s = fs::read_to_string(&path)?;
                let body: Value = serde_json::from_str(&s).map_err(|e| {
                    ProviderError::Api(format!("malformed fixture {operation_name}: {e}"))
                })?;
                Ok(body.get("data").cloned().unwrap_or_else(|| json!({})))
            }
            ClientMode::Http { base_url, token } => {
                let Some(token) = token.as_ref() else {
                    return Err(ProviderError::Authentication(
                        "not authenticated; run `monarch auth set-token` or set MONARCH_TOKEN"
                            .to_string(),
                    ));
                };

                let url = format!("{}/graphql", base_url.trim_end_matches('/'));
                let http = reqwest::blocking::Client::new();

                let resp = http
                    .post(&url)
                    .header("Authorization", format!("Token {token}"))
                    .json(&json!({
                        "operationName": operation_name,
                        "query": query,
                        "variables": variables,
                    }))
                    .send()?;

                let status = resp.status();
                if status.as_u16() == 401 {
                    return Err(ProviderError::Authentication(
                        "invalid or expired token".to_string(),
                    ));
                }

                let text = resp.text()?;
                if !status.is_success() {
                    let snippet: String = text.chars().take(200).collect();
                    return Err(ProviderError::Api(format!("http {status}: {snippet}")));
                }

                let body: Value = serde_json::from_str(&text)
                    .map_err(|e| ProviderError::Api(format!("malformed response: {e}")))?;

                if let Some(msg) = format_graphql_error(&body) {
                    return Err(ProviderError::Api(msg));
                }

                Ok(body.get("data").cloned().unwrap_or_else(|| json!({})))
            }
        }
    }
}

fn format_graphql_error(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    let first = errors.first()?;
    let message = first.get("message").and_then(|m| m.as_str()).unwrap_or("");
    let code = first
        .get("extensions")
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_str());

    if message.is_empty() && code.is_none() {
        return None;
    }

    let mut out = String::new();
    out.push_str("graphql error");
    if let Some(c) = code {
        out.push_str(&format!(" ({c})"));
    }
    if !message.is_empty() {
        out.push_str(&format!(": {message}"));
    }
    Some(out)
}

/// Collapses a mutation result's structured `errors` object into one message,
/// concatenating field errors verbatim.
pub(crate) fn mutation_error_message(result: &Value) -> Option<String> {
    let errors = result.get("errors")?;
    if errors.is_null() {
        return None;
    }

    if let Some(msg) = errors.get("message").and_then(|m| m.as_str())
        && !msg.is_empty()
    {
        return Some(msg.to_string());
    }

    let field_errors = errors.get("fieldErrors")?.as_array()?;
    let mut parts = Vec::new();
    for fe in field_errors {
        let field = fe.get("field").and_then(|f| f.as_str()).unwrap_or("field");
        let messages = fe
            .get("messages")
            .and_then(|m| m.as_array())
            .map(|msgs| {
                msgs.iter()
                    .filter_map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        parts.push(format!("{field}: {messages}"));
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("; "))
}
