use std::collections::HashMap;

use regex::Regex;

use crate::error::Result;
use crate::fmt::pretty_format;
use crate::lookup::{CategoryRule, LookupStore, MatchKind};
use crate::qif::QifDocument;
use crate::reviewer::{Operator, UNCATEGORIZED};

/// Payee matcher that compiles each regex pattern the first time it is seen.
/// An invalid pattern is remembered as `None` and never matches.
#[derive(Debug, Default)]
pub struct Matcher {
    compiled: HashMap<String, Option<Regex>>,
}

impl Matcher {
    fn matches(&mut self, rule: &CategoryRule, payee: &str) -> bool {
        match rule.kind {
            MatchKind::Regex => {
                if !self.compiled.contains_key(&rule.pattern) {
                    let re = Regex::new(&rule.pattern)
                        .map_err(|e| tracing::warn!("Skipping invalid regex [{}]: {e}", rule.pattern))
                        .ok();
                    self.compiled.insert(rule.pattern.clone(), re);
                }
                self.compiled[&rule.pattern]
                    .as_ref()
                    .is_some_and(|re| re.is_match(payee))
            }
            MatchKind::Literal => payee
                .to_lowercase()
                .contains(&rule.pattern.to_lowercase()),
        }
    }

    /// First category with a rule matching `payee`, scanning categories in
    /// store order and each category's rules in insertion order.
    pub fn classify<'a>(&mut self, payee: &str, store: &'a LookupStore) -> Option<&'a str> {
        if payee.trim().is_empty() {
            return None;
        }
        for (category, rules) in store.rules() {
            if rules.iter().any(|rule| self.matches(rule, payee)) {
                tracing::debug!("Matched payee \"{payee}\" to category \"{category}\"");
                return Some(category.as_str());
            }
        }
        tracing::debug!("No pattern matched for payee: \"{payee}\"");
        None
    }
}

pub fn classify<'a>(payee: &str, store: &'a LookupStore) -> Option<&'a str> {
    Matcher::default().classify(payee, store)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CategorizeResult {
    pub matched: usize,
    pub reviewed: usize,
    pub uncategorized: usize,
    pub rules_added: usize,
}

/// Give every transaction in `doc` a category, in document order. Payees no
/// rule matches go to `operator`, and any rule it offers is saved to `store`
/// before the next transaction is looked at.
pub fn categorize_document(
    doc: &mut QifDocument,
    store: &mut LookupStore,
    categories: &[String],
    operator: &mut dyn Operator,
) -> Result<CategorizeResult> {
    let mut result = CategorizeResult::default();
    let mut matcher = Matcher::default();

    for txn in doc.transactions.iter_mut() {
        let payee = txn.payee().unwrap_or_default().to_string();
        if let Some(category) = matcher.classify(&payee, store) {
            txn.categorize(category);
            result.matched += 1;
            continue;
        }

        tracing::debug!("Needs review:\n{}", pretty_format(txn));
        let category = operator.choose_category(txn, categories)?;
        if category == UNCATEGORIZED {
            result.uncategorized += 1;
        } else {
            result.reviewed += 1;
            if let Some(rule) = operator.choose_rule(&category, &payee)? {
                if store.add_rule(&category, rule)? {
                    result.rules_added += 1;
                }
            }
        }
        txn.categorize(category);
    }

    Ok(result)
}
