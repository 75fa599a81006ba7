use regex::Regex;

use crate::error::Result;
use crate::lookup::CategoryRule;
use crate::models::Record;

/// Category recorded when the operator declines to pick one.
pub const UNCATEGORIZED: &str = "Unspecified";

/// The person resolving transactions no rule could classify.
pub trait Operator {
    /// Pick a category for `txn` from `categories`, or [`UNCATEGORIZED`].
    fn choose_category(&mut self, txn: &Record, categories: &[String]) -> Result<String>;

    /// Offer a rule for future payees like `payee`. `None` skips rule creation.
    /// A returned rule must already match `payee`.
    fn choose_rule(&mut self, category: &str, payee: &str) -> Result<Option<CategoryRule>>;
}

/// Map raw category input to a valid choice. Blank input means
/// [`UNCATEGORIZED`]; anything outside `categories` is rejected.
pub fn resolve_category(input: &str, categories: &[String]) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return Some(UNCATEGORIZED.to_string());
    }
    categories
        .iter()
        .find(|c| c.as_str() == input)
        .cloned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleInput {
    Skip,
    Accepted(CategoryRule),
    NoMatch,
    InvalidRegex(String),
}

/// Interpret rule input: `/re/` is a case-sensitive regex search, anything
/// else a case-insensitive substring. Either must match `payee`.
pub fn parse_rule_input(input: &str, payee: &str) -> RuleInput {
    let input = input.trim();
    if input.is_empty() {
        return RuleInput::Skip;
    }
    if let Some(pattern) = input
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
    {
        if pattern.is_empty() {
            return RuleInput::InvalidRegex("empty pattern".to_string());
        }
        return match Regex::new(pattern) {
            Ok(re) if re.is_match(payee) => RuleInput::Accepted(CategoryRule::regex(pattern)),
            Ok(_) => RuleInput::NoMatch,
            Err(e) => RuleInput::InvalidRegex(e.to_string()),
        };
    }
    if payee.to_lowercase().contains(&input.to_lowercase()) {
        RuleInput::Accepted(CategoryRule::literal(input))
    } else {
        RuleInput::NoMatch
    }
}
