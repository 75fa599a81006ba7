use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{QifcatError, Result};

pub const DEFAULT_ACCOUNT_CONFIG: &str = "etc/account-config.json";
pub const DEFAULT_LOOKUP_FILE: &str = "etc/category-payee-lookup.json";
pub const DEFAULT_DATABASE_FILE: &str = "accounting-books.db.gnucash";

/// CSV column indices for the fields copied into each transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    pub date: usize,
    pub name: usize,
    pub amount: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountConfig {
    pub full_account_name: String,
    pub account_type: String,
    pub colspec: ColumnSpec,
}

/// Look up one account in the account config file, which maps short account
/// names to their settings.
pub fn load_account_config(path: &Path, account_name: &str) -> Result<AccountConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_account_config(&content, account_name)
}

fn parse_account_config(content: &str, account_name: &str) -> Result<AccountConfig> {
    let mut raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)?;
    let value = raw
        .remove(account_name)
        .ok_or_else(|| QifcatError::UnknownAccount(account_name.to_string()))?;
    serde_json::from_value(value)
        .map_err(|e| QifcatError::Config(format!("account '{account_name}': {e}")))
}

pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}
