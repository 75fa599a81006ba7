use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{QifcatError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Literal,
    Regex,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Literal => "literal",
            MatchKind::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    #[serde(rename = "payee")]
    pub pattern: String,
    #[serde(rename = "type")]
    pub kind: MatchKind,
}

impl CategoryRule {
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: MatchKind::Literal,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: MatchKind::Regex,
        }
    }
}

pub type RuleTable = IndexMap<String, Vec<CategoryRule>>;

/// Category name to payee rules, backed by a JSON file that is rewritten in
/// full after every change.
#[derive(Debug)]
pub struct LookupStore {
    path: PathBuf,
    rules: RuleTable,
}

impl LookupStore {
    /// Load the lookup file, or create it with an empty rule list for each of
    /// `categories` if it does not exist yet.
    pub fn open(path: &Path, categories: &[String]) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let rules: RuleTable = serde_json::from_str(&content)?;
            tracing::debug!("Loaded {} categories from {}", rules.len(), path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                rules,
            });
        }

        let rules = categories
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let store = Self {
            path: path.to_path_buf(),
            rules,
        };
        store.save()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn ensure_category_exists(&mut self, category: &str) -> Result<()> {
        if !self.rules.contains_key(category) {
            self.rules.insert(category.to_string(), Vec::new());
            if let Err(e) = self.save() {
                self.rules.shift_remove(category);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Append `rule` to `category`. A rule whose pattern is already listed
    /// under that category is ignored and `false` is returned. If the file
    /// cannot be written the rule is not kept.
    pub fn add_rule(&mut self, category: &str, rule: CategoryRule) -> Result<bool> {
        let new_category = !self.rules.contains_key(category);
        let entries = self.rules.entry(category.to_string()).or_default();
        if entries.iter().any(|existing| existing.pattern == rule.pattern) {
            return Ok(false);
        }
        let (kind, pattern) = (rule.kind, rule.pattern.clone());
        entries.push(rule);

        if let Err(e) = self.save() {
            if new_category {
                self.rules.shift_remove(category);
            } else if let Some(entries) = self.rules.get_mut(category) {
                entries.pop();
            }
            return Err(e);
        }
        tracing::info!(
            "Added {} pattern: [{pattern}] for category: {category}",
            kind.as_str()
        );
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.rules.serialize(&mut ser)?;
        buf.push(b'\n');

        let persist_err = |source: std::io::Error| QifcatError::Persist {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(persist_err)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, &buf).map_err(persist_err)?;
        std::fs::rename(&tmp, &self.path).map_err(persist_err)?;
        tracing::info!("Lookup file updated: {}", self.path.display());
        Ok(())
    }
}
