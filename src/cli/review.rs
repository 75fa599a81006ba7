use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::{Completion, Input};

use crate::error::Result;
use crate::fmt::review_rows;
use crate::lookup::CategoryRule;
use crate::models::Record;
use crate::reviewer::{parse_rule_input, resolve_category, Operator, RuleInput, UNCATEGORIZED};

/// Tab-completes the first category starting with the typed text, ignoring case.
struct CategoryCompleter {
    categories: Vec<String>,
}

impl CategoryCompleter {
    fn new(categories: &[String]) -> Self {
        let mut categories = categories.to_vec();
        categories.sort();
        Self { categories }
    }
}

impl Completion for CategoryCompleter {
    fn get(&self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        let query = input.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.to_lowercase().starts_with(&query))
            .cloned()
    }
}

/// Prompts on the terminal for transactions no rule matched.
#[derive(Default)]
pub struct TerminalOperator {
    completer: Option<CategoryCompleter>,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operator for TerminalOperator {
    fn choose_category(&mut self, txn: &Record, categories: &[String]) -> Result<String> {
        println!("{}", "\u{2500}".repeat(60));
        let mut table = Table::new();
        for (label, value) in review_rows(txn) {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        println!("{table}\n");

        let completer = self
            .completer
            .get_or_insert_with(|| CategoryCompleter::new(categories));
        loop {
            let input: String = Input::new()
                .with_prompt(format!(
                    "Category for this payee (Enter to mark as \"{UNCATEGORIZED}\")"
                ))
                .allow_empty(true)
                .completion_with(&*completer)
                .interact_text()?;

            match resolve_category(&input, categories) {
                Some(category) => {
                    tracing::info!("Confirmed that [{category}] is in the list of valid categories");
                    return Ok(category);
                }
                None => {
                    tracing::warn!("Category {} not found.", input.trim());
                    println!("{}", format!("Category {} not found.", input.trim()).red());
                }
            }
        }
    }

    fn choose_rule(&mut self, category: &str, payee: &str) -> Result<Option<CategoryRule>> {
        loop {
            let input: String = Input::new()
                .with_prompt(format!(
                    "Pattern for future \"{category}\" payees: /regex/, text for a case-insensitive match, or Enter to skip"
                ))
                .allow_empty(true)
                .interact_text()?;

            match parse_rule_input(&input, payee) {
                RuleInput::Skip => return Ok(None),
                RuleInput::Accepted(rule) => {
                    tracing::info!(
                        "Confirmed that {} [{}] matches the given payee {payee}",
                        rule.kind.as_str(),
                        rule.pattern
                    );
                    println!("{}", format!("\u{2192} Rule saved for {category}").green());
                    return Ok(Some(rule));
                }
                RuleInput::NoMatch => {
                    tracing::warn!("Pattern \"{}\" does not match the payee \"{payee}\"", input.trim());
                    println!(
                        "{}",
                        format!("Pattern \"{}\" does not match \"{payee}\". Please try again.", input.trim()).red()
                    );
                }
                RuleInput::InvalidRegex(e) => {
                    tracing::warn!("Invalid regex \"{}\": {e}", input.trim());
                    println!("{}", format!("Invalid regex: {e}").red());
                }
            }
        }
    }
}
